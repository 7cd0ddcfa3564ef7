//! The JSON "back app" endpoint
//!
//! A simpler entry point than the inferencing endpoint: the service picks
//! the model and prompt, the caller sends `{query, collection}` and
//! authenticates with the bearer token the transport attaches. It is served
//! by the chatbot front, so the path resolves against [`Root::Chatbot`].

use std::sync::Arc;

use serde_json::json;

use crate::endpoints;
use crate::error::Result;
use crate::response::Answer;
use crate::transport::{call, ApiRequest, Root, Transport};

/// Sends questions to the back app endpoint
pub struct QuickAsk<T: Transport + ?Sized> {
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> QuickAsk<T> {
    /// Create over a shared transport
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Ask a question against a collection
    pub async fn ask(&self, question: &str, collection: &str) -> Result<Answer> {
        let request = ApiRequest::post(endpoints::BACK_APP)
            .with_root(Root::Chatbot)
            .json(json!({
                "query": question,
                "collection": collection,
            }));
        call(self.transport.as_ref(), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Body, Method, MockTransport};

    #[tokio::test]
    async fn test_ask_sends_json_body() {
        let mock = Arc::new(MockTransport::new().respond(
            Method::Post,
            endpoints::BACK_APP,
            json!({"answer": "Appelez le 15"}),
        ));
        let quick = QuickAsk::new(mock.clone());

        let answer = quick.ask("Que faire en cas de malaise ?", "secourisme").await.unwrap();
        assert_eq!(answer.answer(), Some("Appelez le 15"));

        let calls = mock.calls();
        assert_eq!(calls[0].root, Root::Chatbot);
        match &calls[0].body {
            Body::Json(body) => {
                assert_eq!(body["query"], "Que faire en cas de malaise ?");
                assert_eq!(body["collection"], "secourisme");
            }
            other => panic!("expected json body, got {:?}", other),
        }
    }
}
