//! Document ingestion
//!
//! Uploads go out as one multipart request: a `file` part plus the
//! `collection_name`, `model` and `api_key` text fields. Chunking and
//! embedding happen on the service.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;

use crate::config::ApiKey;
use crate::endpoints;
use crate::error::{Error, Result};
use crate::response::{Ack, DocumentList, IngestReceipt};
use crate::transport::{call, ApiRequest, FieldValue, FilePayload, Transport};

/// Where the uploaded bytes come from
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Read from disk at upload time
    Path(PathBuf),
    /// Already in memory
    Memory(FilePayload),
}

/// A document to add to a collection
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    /// Target collection
    pub collection_name: String,
    /// File content
    pub source: DocumentSource,
    /// Embedding model identifier, e.g. `mistral-embed`
    pub embedding_model: String,
    /// Credential sent in the `api_key` field
    pub api_key: ApiKey,
    /// Overrides the file name reported to the service
    pub file_name: Option<String>,
}

impl DocumentUpload {
    /// Upload a file from disk
    pub fn from_path(
        collection_name: impl Into<String>,
        path: impl Into<PathBuf>,
        embedding_model: impl Into<String>,
        api_key: impl Into<ApiKey>,
    ) -> Self {
        Self {
            collection_name: collection_name.into(),
            source: DocumentSource::Path(path.into()),
            embedding_model: embedding_model.into(),
            api_key: api_key.into(),
            file_name: None,
        }
    }

    /// Upload in-memory content
    pub fn from_bytes(
        collection_name: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
        embedding_model: impl Into<String>,
        api_key: impl Into<ApiKey>,
    ) -> Self {
        Self {
            collection_name: collection_name.into(),
            source: DocumentSource::Memory(FilePayload::new(file_name, content)),
            embedding_model: embedding_model.into(),
            api_key: api_key.into(),
            file_name: None,
        }
    }

    /// Report a different file name to the service
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Resolve the file payload
    ///
    /// A missing path fails with [`Error::NotFound`]. Format and size are
    /// left for the service to judge.
    pub async fn load(&self) -> Result<FilePayload> {
        let mut payload = match &self.source {
            DocumentSource::Memory(payload) => payload.clone(),
            DocumentSource::Path(path) => {
                let content = match tokio::fs::read(path).await {
                    Ok(content) => content,
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        return Err(Error::NotFound(path.clone()));
                    }
                    Err(e) => return Err(e.into()),
                };
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| Error::NotFound(path.clone()))?;
                FilePayload::new(file_name, content)
            }
        };

        if let Some(name) = &self.file_name {
            payload.file_name = name.clone();
        }
        Ok(payload)
    }

    fn fields(&self) -> Vec<(String, FieldValue)> {
        vec![
            ("collection_name".to_string(), self.collection_name.as_str().into()),
            ("model".to_string(), self.embedding_model.as_str().into()),
            ("api_key".to_string(), (&self.api_key).into()),
        ]
    }
}

/// Adds, lists and deletes documents in a collection
pub struct DocumentIngestor<T: Transport + ?Sized> {
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> DocumentIngestor<T> {
    /// Create an ingestor over a shared transport
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Upload a document
    ///
    /// The file is read before anything is sent, so a missing file never
    /// reaches the network.
    pub async fn add_document(&self, upload: &DocumentUpload) -> Result<IngestReceipt> {
        let file = upload.load().await?;
        tracing::debug!(
            collection = %upload.collection_name,
            file = %file.file_name,
            bytes = file.content.len(),
            model = %upload.embedding_model,
            "uploading document"
        );

        let request =
            ApiRequest::post(endpoints::COLLECTION_ADD_DOCUMENT).multipart(upload.fields(), file);
        call(self.transport.as_ref(), request).await
    }

    /// List documents in a collection
    pub async fn list_documents(&self, collection_name: &str) -> Result<DocumentList> {
        let request = ApiRequest::get(endpoints::COLLECTION_DOCUMENTS)
            .query("collection_name", collection_name);
        call(self.transport.as_ref(), request).await
    }

    /// Delete a document from a collection
    pub async fn delete_document(&self, collection_name: &str, document_id: &str) -> Result<Ack> {
        tracing::debug!(collection = collection_name, document_id, "deleting document");
        let request = ApiRequest::delete(endpoints::COLLECTION_DOCUMENT)
            .query("collection_name", collection_name)
            .query("document_id", document_id);
        call(self.transport.as_ref(), request).await
    }
}
