//! Transport trait and the request shape every component builds
//!
//! A transport executes exactly one HTTP exchange and returns the parsed
//! JSON body. It never retries and never recovers from a failure.

pub mod mock;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

use serde_json::Value;

use crate::config::{ApiKey, REDACTED};
use crate::error::{Error, Result};
use crate::response::FromResponse;

pub use mock::{MockTransport, RecordedCall};

/// HTTP verbs used by the RAG service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl Method {
    /// Verb as written on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which service root a path is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Root {
    /// The RAG API, [`RagConfig::base_url`](crate::config::RagConfig::base_url)
    #[default]
    Api,
    /// The chatbot front, [`RagConfig::chatbot_root`](crate::config::RagConfig::chatbot_root)
    Chatbot,
}

/// A query parameter or form field value
#[derive(Clone, PartialEq)]
pub enum FieldValue {
    /// Plain text (numbers are carried in their decimal form)
    Text(String),
    /// A credential; redacted in `Debug`
    Secret(ApiKey),
}

impl FieldValue {
    /// Value as sent on the wire
    pub fn expose(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Secret(key) => key.expose(),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => fmt::Debug::fmt(s, f),
            FieldValue::Secret(key) => fmt::Debug::fmt(key, f),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Text(s.clone())
    }
}

impl From<&ApiKey> for FieldValue {
    fn from(key: &ApiKey) -> Self {
        FieldValue::Secret(key.clone())
    }
}

impl From<ApiKey> for FieldValue {
    fn from(key: ApiKey) -> Self {
        FieldValue::Secret(key)
    }
}

macro_rules! impl_numeric_field {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(n: $t) -> Self {
                    FieldValue::Text(n.to_string())
                }
            }
        )*
    };
}

impl_numeric_field!(i32, i64, u32, u64, usize, f32, f64);

/// Ordered name/value pairs
pub type Fields = Vec<(String, FieldValue)>;

/// A file to upload
#[derive(Clone)]
pub struct FilePayload {
    /// Name reported to the service
    pub file_name: String,
    /// Raw file content
    pub content: Bytes,
}

impl FilePayload {
    /// Create a payload from in-memory content
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

impl fmt::Debug for FilePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePayload")
            .field("file_name", &self.file_name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// JSON body fields that carry a credential
pub const SECRET_JSON_FIELDS: &[&str] = &["api_key"];

/// Request body
///
/// `Debug` redacts [`SECRET_JSON_FIELDS`] in JSON bodies and secret form
/// fields.
#[derive(Clone, Default)]
pub enum Body {
    /// No body
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded`
    Form(Fields),
    /// `multipart/form-data`: text fields followed by one file part named `file`
    Multipart {
        /// Text fields
        fields: Fields,
        /// The file part
        file: FilePayload,
    },
    /// `application/json`
    Json(Value),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Form(fields) => f.debug_tuple("Form").field(fields).finish(),
            Body::Multipart { fields, file } => f
                .debug_struct("Multipart")
                .field("fields", fields)
                .field("file", file)
                .finish(),
            Body::Json(value) => f.debug_tuple("Json").field(&redact_json(value)).finish(),
        }
    }
}

fn redact_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if SECRET_JSON_FIELDS.contains(&k.as_str()) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_json(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_json).collect()),
        other => other.clone(),
    }
}

/// One call against the RAG service
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP verb
    pub method: Method,
    /// Root the path is resolved against
    pub root: Root,
    /// Endpoint path relative to the root
    pub path: String,
    /// Query string parameters, in insertion order
    pub query: Fields,
    /// Request body
    pub body: Body,
}

impl ApiRequest {
    /// Create a request with no parameters
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            root: Root::Api,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Resolve the path against another root
    pub fn with_root(mut self, root: Root) -> Self {
        self.root = root;
        self
    }

    /// Add a query parameter
    pub fn query(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Use a url-encoded form body
    pub fn form(mut self, fields: Fields) -> Self {
        self.body = Body::Form(fields);
        self
    }

    /// Use a multipart body
    pub fn multipart(mut self, fields: Fields, file: FilePayload) -> Self {
        self.body = Body::Multipart { fields, file };
        self
    }

    /// Use a JSON body
    pub fn json(mut self, value: Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    /// Look up a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        find_field(&self.query, name)
    }

    /// Look up a form or multipart text field
    pub fn form_field(&self, name: &str) -> Option<&str> {
        match &self.body {
            Body::Form(fields) | Body::Multipart { fields, .. } => find_field(fields, name),
            _ => None,
        }
    }

    /// Look up a string field of a JSON body
    pub fn json_field(&self, name: &str) -> Option<&str> {
        match &self.body {
            Body::Json(value) => value.get(name).and_then(Value::as_str),
            _ => None,
        }
    }
}

fn find_field<'a>(fields: &'a Fields, name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.expose())
}

/// Executes requests against the RAG service
///
/// Implement this trait to reach the service some other way (for instance a
/// test double, or a different HTTP stack).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request
    ///
    /// Returns the parsed body for a 2xx answer. Failures map to
    /// [`Error::Transport`], [`Error::Remote`] or [`Error::Decode`].
    async fn execute(&self, request: ApiRequest) -> Result<Value>;

    /// Get transport name (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// Execute a request and read the endpoint's typed result
pub(crate) async fn call<T, R>(transport: &T, request: ApiRequest) -> Result<R>
where
    T: Transport + ?Sized,
    R: FromResponse,
{
    let raw = transport.execute(request).await?;
    R::from_response(raw)
}

/// Parse a 2xx body the way every transport must
///
/// An empty body reads as `null`; anything else must be JSON.
pub fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| {
        Error::decode(
            format!("response is not valid JSON: {}", e),
            String::from_utf8_lossy(body).into_owned(),
        )
    })
}
