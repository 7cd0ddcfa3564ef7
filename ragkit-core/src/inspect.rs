//! Retrieval-only inspection, for debugging what the service retrieves

use std::sync::Arc;

use serde_json::json;

use crate::config::ApiKey;
use crate::endpoints;
use crate::error::Result;
use crate::query::QueryRequest;
use crate::response::RetrievedChunks;
use crate::transport::{call, ApiRequest, Transport};

/// A retrieval-only query
#[derive(Debug, Clone)]
pub struct ChunkQuery {
    /// The question to retrieve for
    pub query: String,
    /// Collection to retrieve from
    pub collection_name: String,
    /// Credential sent in the `api_key` param
    pub api_key: ApiKey,
}

impl ChunkQuery {
    /// Create a query
    pub fn new(
        query: impl Into<String>,
        collection_name: impl Into<String>,
        api_key: impl Into<ApiKey>,
    ) -> Self {
        Self {
            query: query.into(),
            collection_name: collection_name.into(),
            api_key: api_key.into(),
        }
    }

    fn to_api_request(&self) -> ApiRequest {
        ApiRequest::post(endpoints::GET_EMBEDDINGS).json(json!({
            "query": self.query,
            "collection_name": self.collection_name,
            "api_key": self.api_key.expose(),
        }))
    }
}

impl From<&QueryRequest> for ChunkQuery {
    fn from(request: &QueryRequest) -> Self {
        Self {
            query: request.query.clone(),
            collection_name: request.collection_name.clone(),
            api_key: request.api_key.clone(),
        }
    }
}

/// Returns the chunks retrieval would feed to generation
///
/// Only ever calls the retrieval endpoint.
pub struct EmbeddingInspector<T: Transport + ?Sized> {
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> EmbeddingInspector<T> {
    /// Create an inspector over a shared transport
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Fetch the retrieved chunks for a query
    pub async fn get_retrieved_chunks(&self, query: &ChunkQuery) -> Result<RetrievedChunks> {
        call(self.transport.as_ref(), query.to_api_request()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Method, MockTransport};

    #[tokio::test]
    async fn test_inspection_never_generates() {
        let mock = Arc::new(MockTransport::new().respond(
            Method::Post,
            endpoints::GET_EMBEDDINGS,
            json!({"chunks": [{"content": "Deadline: Sunday 18:00", "score": 0.8}]}),
        ));
        let inspector = EmbeddingInspector::new(mock.clone());

        let request = QueryRequest::new("What is the deadline?", "hackathon_rules", "k");
        let chunks = inspector
            .get_retrieved_chunks(&ChunkQuery::from(&request))
            .await
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert!(mock.calls_to(endpoints::RETRIEVE_ANSWER).is_empty());

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].query.is_empty());
        assert_eq!(calls[0].json_field("collection_name"), Some("hackathon_rules"));
        assert_eq!(calls[0].json_field("api_key"), Some("k"));
        assert_eq!(calls[0].json_field("prompt"), None);
        assert_eq!(calls[0].json_field("history_data"), None);
    }
}
