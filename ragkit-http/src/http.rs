//! HTTP transport implementation
//!
//! One pooled `reqwest::Client` per transport. Every call carries
//! `Accept: application/json` and, when a credential is configured,
//! `Authorization: Bearer <key>`.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};

use ragkit_core::transport::{parse_body, ApiRequest, Body, Fields, FilePayload, Method};

use crate::{Error, HttpConfig, RagConfig, Result, Transport};

/// Transport over HTTP(S)
pub struct HttpTransport {
    client: reqwest::Client,
    config: RagConfig,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Create with default HTTP settings
    pub fn new(config: RagConfig) -> Result<Self> {
        Self::with_http_config(config, HttpConfig::default())
    }

    /// Create with custom HTTP settings
    ///
    /// The config is validated first, so a deserialized one is normalized
    /// the same way as one built with [`RagConfig::new`].
    pub fn with_http_config(config: RagConfig, http: HttpConfig) -> Result<Self> {
        let config = config.validated()?;
        let client = http.build_client()?;
        let headers = build_headers(&config)?;
        Ok(Self {
            client,
            config,
            headers,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(RagConfig::from_env()?)
    }

    /// The configuration this transport targets
    pub fn config(&self) -> &RagConfig {
        &self.config
    }
}

fn build_headers(config: &RagConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = &config.api_key {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose()))
            .map_err(|_| Error::config("api key contains characters not allowed in a header"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn exposed(fields: &Fields) -> Vec<(&str, &str)> {
    fields.iter().map(|(k, v)| (k.as_str(), v.expose())).collect()
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

fn multipart_form(fields: Fields, file: FilePayload) -> Result<Form> {
    let mime = mime_for(&file.file_name);
    let part = Part::bytes(file.content.to_vec())
        .file_name(file.file_name)
        .mime_str(mime)
        .map_err(|e| Error::Internal(format!("invalid mime type {}: {}", mime, e)))?;

    let form = fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name, value.expose().to_string())
        });
    Ok(form.part("file", part))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value> {
        let request_id = uuid::Uuid::new_v4();
        let ApiRequest {
            method,
            root,
            path,
            query,
            body,
        } = request;
        let started = Instant::now();

        let mut builder = self
            .client
            .request(to_reqwest(method), self.config.endpoint(root, &path))
            .headers(self.headers.clone());
        if !query.is_empty() {
            builder = builder.query(&exposed(&query));
        }
        builder = match body {
            Body::Empty => builder,
            Body::Form(fields) => builder.form(&exposed(&fields)),
            Body::Multipart { fields, file } => builder.multipart(multipart_form(fields, file)?),
            Body::Json(value) => builder.json(&value),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = Error::from(e);
                tracing::warn!(
                    %request_id,
                    %method,
                    path = %path,
                    error = %err,
                    "rag request failed"
                );
                return Err(err);
            }
        };

        let status = response.status();
        let bytes = response.bytes().await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            tracing::warn!(
                %request_id,
                %method,
                path = %path,
                status = status.as_u16(),
                elapsed_ms,
                "rag service returned an error"
            );
            return Err(Error::remote(
                status.as_u16(),
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }

        tracing::debug!(
            %request_id,
            %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "rag request finished"
        );
        parse_body(&bytes)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_is_sensitive() {
        let config = RagConfig::new("http://localhost:8000")
            .unwrap()
            .with_api_key("sk-test");
        let headers = build_headers(&config).unwrap();

        let auth = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer sk-test");
        assert!(auth.is_sensitive());
        assert!(!format!("{:?}", headers).contains("sk-test"));
    }

    #[test]
    fn test_no_credential_no_auth_header() {
        let config = RagConfig::new("http://localhost:8000").unwrap();
        let headers = build_headers(&config).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_key_rejected() {
        let config = RagConfig::new("http://localhost:8000")
            .unwrap()
            .with_api_key("bad\nkey");
        assert!(matches!(build_headers(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_deserialized_config_is_validated() {
        let config: RagConfig =
            serde_json::from_str(r#"{"base_url":"http://localhost:8000/","api_key":"  "}"#)
                .unwrap();
        let transport = HttpTransport::new(config).unwrap();
        assert_eq!(transport.config().base_url, "http://localhost:8000");
        assert!(transport.config().api_key.is_none());
        assert!(transport.headers.get(AUTHORIZATION).is_none());

        let config: RagConfig = serde_json::from_str(r#"{"base_url":"localhost:8000"}"#).unwrap();
        assert!(matches!(HttpTransport::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("rules.PDF"), "application/pdf");
        assert_eq!(mime_for("notes.md"), "text/markdown");
        assert_eq!(mime_for("archive"), "application/octet-stream");
    }
}
