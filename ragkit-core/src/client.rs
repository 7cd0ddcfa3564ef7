//! Client facade bundling one transport with every component

use std::sync::Arc;

use crate::ask::QuickAsk;
use crate::collections::CollectionManager;
use crate::documents::DocumentIngestor;
use crate::inspect::EmbeddingInspector;
use crate::query::QueryEngine;
use crate::quiz::QuizGenerator;
use crate::transport::Transport;

/// Entry point to the remote RAG service
///
/// Holds no state besides the shared transport. Cloning is cheap and
/// clones can be used from different tasks at once.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use ragkit_core::prelude::*;
///
/// # async fn run() -> ragkit_core::Result<()> {
/// let client = RagClient::new(Arc::new(MockTransport::new()));
/// let names = client.collections().list_collections().await?;
/// println!("{:?}", names.names());
/// # Ok(())
/// # }
/// ```
pub struct RagClient<T: Transport + ?Sized> {
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> Clone for RagClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport + ?Sized> RagClient<T> {
    /// Create a client over a transport
    pub fn new(transport: Arc<T>) -> Self {
        tracing::debug!(transport = transport.name(), "rag client created");
        Self { transport }
    }

    /// The shared transport
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Collection management
    pub fn collections(&self) -> CollectionManager<T> {
        CollectionManager::new(Arc::clone(&self.transport))
    }

    /// Document ingestion
    pub fn documents(&self) -> DocumentIngestor<T> {
        DocumentIngestor::new(Arc::clone(&self.transport))
    }

    /// Retrieve-and-generate queries
    pub fn query(&self) -> QueryEngine<T> {
        QueryEngine::new(Arc::clone(&self.transport))
    }

    /// Retrieval-only inspection
    pub fn inspector(&self) -> EmbeddingInspector<T> {
        EmbeddingInspector::new(Arc::clone(&self.transport))
    }

    /// The back app endpoint
    pub fn quick_ask(&self) -> QuickAsk<T> {
        QuickAsk::new(Arc::clone(&self.transport))
    }

    /// Quiz generation
    pub fn quiz(&self) -> QuizGenerator<T> {
        QuizGenerator::new(Arc::clone(&self.transport))
    }
}
