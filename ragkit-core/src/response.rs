//! Typed views over the service's JSON responses
//!
//! The service's success schemas are loosely specified, so every result
//! keeps the raw body next to the fields it could read. Field names that
//! are looked up are listed on each type; check them against the live
//! service with [`raw`](Answer::raw) when something comes back `None`.

use serde_json::Value;

use crate::error::{Error, Result};

/// Field expected to carry the generated answer text
pub const ANSWER_FIELD: &str = "answer";
/// Field expected to carry source attribution
pub const SOURCES_FIELD: &str = "sources";

const COLLECTION_LIST_KEYS: &[&str] = &["collections", "data", "items"];
const COLLECTION_NAME_KEYS: &[&str] = &["name", "collection_name"];
const DOCUMENT_LIST_KEYS: &[&str] = &["documents", "data", "items"];
const DOCUMENT_ID_KEYS: &[&str] = &["document_id", "id", "_id"];
const DOCUMENT_NAME_KEYS: &[&str] = &["filename", "file_name", "name"];
const CHUNK_LIST_KEYS: &[&str] = &["chunks", "results", "documents", "data"];
const CHUNK_TEXT_KEYS: &[&str] = &["content", "text", "page_content", "chunk"];
const CHUNK_SCORE_KEYS: &[&str] = &["score", "similarity", "distance"];
const MESSAGE_KEYS: &[&str] = &["message", "detail", "status"];

/// Conversion from a parsed response body
pub trait FromResponse: Sized {
    /// Read the typed view, keeping `raw`
    fn from_response(raw: Value) -> Result<Self>;
}

impl FromResponse for Value {
    fn from_response(raw: Value) -> Result<Self> {
        Ok(raw)
    }
}

/// Result of `GET /api/app/collection/list`
///
/// Accepts a bare array or an object holding one under `collections`,
/// `data` or `items`. Items are names, or objects with `name` /
/// `collection_name`.
#[derive(Debug, Clone)]
pub struct CollectionList {
    names: Vec<String>,
    raw: Value,
}

impl CollectionList {
    /// Collection names in service order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// How many times `name` appears
    pub fn count_of(&self, name: &str) -> usize {
        self.names.iter().filter(|n| *n == name).count()
    }

    /// Whether `name` is listed
    pub fn contains(&self, name: &str) -> bool {
        self.count_of(name) > 0
    }

    /// Raw response body
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl FromResponse for CollectionList {
    fn from_response(raw: Value) -> Result<Self> {
        let items = list_under(&raw, COLLECTION_LIST_KEYS)
            .ok_or_else(|| Error::decode("expected a list of collections", raw.to_string()))?;

        let names = items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => text_field(other, COLLECTION_NAME_KEYS),
            })
            .collect();

        Ok(Self { names, raw })
    }
}

/// Acknowledgement from a create or delete call
#[derive(Debug, Clone)]
pub struct Ack {
    /// `message`, `detail` or `status` when present
    pub message: Option<String>,
    raw: Value,
}

impl Ack {
    /// Raw response body
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl FromResponse for Ack {
    fn from_response(raw: Value) -> Result<Self> {
        let message = match &raw {
            Value::String(s) => Some(s.clone()),
            other => text_field(other, MESSAGE_KEYS),
        };
        Ok(Self { message, raw })
    }
}

/// One entry of a document listing
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    /// `document_id`, `id` or `_id`
    pub id: Option<String>,
    /// `filename`, `file_name` or `name`
    pub file_name: Option<String>,
    /// The entry as returned
    pub raw: Value,
}

/// Result of `GET /api/app/collection/documents`
#[derive(Debug, Clone)]
pub struct DocumentList {
    documents: Vec<DocumentSummary>,
    raw: Value,
}

impl DocumentList {
    /// Documents in service order
    pub fn documents(&self) -> &[DocumentSummary] {
        &self.documents
    }

    /// Find a document by file name
    pub fn find_by_name(&self, file_name: &str) -> Option<&DocumentSummary> {
        self.documents
            .iter()
            .find(|d| d.file_name.as_deref() == Some(file_name))
    }

    /// Raw response body
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl FromResponse for DocumentList {
    fn from_response(raw: Value) -> Result<Self> {
        let items = list_under(&raw, DOCUMENT_LIST_KEYS)
            .ok_or_else(|| Error::decode("expected a list of documents", raw.to_string()))?;

        let documents = items
            .iter()
            .map(|item| match item {
                Value::String(s) => DocumentSummary {
                    id: None,
                    file_name: Some(s.clone()),
                    raw: item.clone(),
                },
                other => DocumentSummary {
                    id: text_field(other, DOCUMENT_ID_KEYS),
                    file_name: text_field(other, DOCUMENT_NAME_KEYS),
                    raw: item.clone(),
                },
            })
            .collect();

        Ok(Self { documents, raw })
    }
}

/// Result of a document upload
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    /// Id assigned by the service, when reported
    pub document_id: Option<String>,
    /// `message`, `detail` or `status` when present
    pub message: Option<String>,
    raw: Value,
}

impl IngestReceipt {
    /// Raw response body
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl FromResponse for IngestReceipt {
    fn from_response(raw: Value) -> Result<Self> {
        Ok(Self {
            document_id: text_field(&raw, DOCUMENT_ID_KEYS),
            message: text_field(&raw, MESSAGE_KEYS),
            raw,
        })
    }
}

/// Result of the retrieve-and-generate call
///
/// The body is kept exactly as received. The answer is read from
/// [`ANSWER_FIELD`] and sources from [`SOURCES_FIELD`]; neither is ever
/// filled in locally.
#[derive(Debug, Clone)]
pub struct Answer {
    raw: Value,
}

impl Answer {
    /// Generated answer text, if the service put one under `answer`
    pub fn answer(&self) -> Option<&str> {
        self.raw.get(ANSWER_FIELD).and_then(Value::as_str)
    }

    /// Source attribution, if present under `sources`
    pub fn sources(&self) -> Option<&[Value]> {
        self.raw
            .get(SOURCES_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Any other top-level field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// Raw response body
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Take the raw response body
    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl FromResponse for Answer {
    fn from_response(raw: Value) -> Result<Self> {
        Ok(Self { raw })
    }
}

/// One retrieved chunk
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// `content`, `text`, `page_content` or `chunk`
    pub content: Option<String>,
    /// `score`, `similarity` or `distance`
    pub score: Option<f64>,
    /// `metadata` object, when present
    pub metadata: Option<Value>,
    /// The entry as returned
    pub raw: Value,
}

/// Result of the chunk inspection call
#[derive(Debug, Clone)]
pub struct RetrievedChunks {
    chunks: Vec<RetrievedChunk>,
    raw: Value,
}

impl RetrievedChunks {
    /// Chunks in retrieval order
    pub fn chunks(&self) -> &[RetrievedChunk] {
        &self.chunks
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing was retrieved
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Raw response body
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl FromResponse for RetrievedChunks {
    fn from_response(raw: Value) -> Result<Self> {
        let items = list_under(&raw, CHUNK_LIST_KEYS)
            .ok_or_else(|| Error::decode("expected a list of chunks", raw.to_string()))?;

        let chunks = items
            .iter()
            .map(|item| match item {
                Value::String(s) => RetrievedChunk {
                    content: Some(s.clone()),
                    score: None,
                    metadata: None,
                    raw: item.clone(),
                },
                other => RetrievedChunk {
                    content: text_field(other, CHUNK_TEXT_KEYS),
                    score: CHUNK_SCORE_KEYS
                        .iter()
                        .find_map(|k| other.get(*k).and_then(Value::as_f64)),
                    metadata: other.get("metadata").cloned(),
                    raw: item.clone(),
                },
            })
            .collect();

        Ok(Self { chunks, raw })
    }
}

fn list_under<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    match raw {
        Value::Array(items) => Some(items),
        Value::Object(map) => keys.iter().find_map(|k| map.get(*k).and_then(Value::as_array)),
        _ => None,
    }
}

// Strings pass through; numeric ids are rendered in decimal.
fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match value.get(*k)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
