//! Combined retrieval and generation
//!
//! The service retrieves, augments and generates behind a single endpoint.
//! This module sends one request per question and hands the body back
//! as-is; there are no separate local retrieve or generate steps to keep
//! in sync.

use std::sync::Arc;

use serde_json::json;

use crate::config::ApiKey;
use crate::endpoints;
use crate::error::Result;
use crate::history::History;
use crate::response::Answer;
use crate::transport::{call, ApiRequest, Transport};

/// Model family used when none is given
pub const DEFAULT_MODEL_FAMILY: &str = "mistral";
/// Model used when none is given
pub const DEFAULT_MODEL_NAME: &str = "mistral-small-latest";
/// Prompt template used when none is given
///
/// `{context}` receives the retrieved chunks and `{query}` the question.
pub const DEFAULT_PROMPT: &str = "Answer the question using only the context below. \
If the context does not contain the answer, say you do not know.\n\n\
Context:\n{context}\n\nQuestion: {query}\n\nAnswer:";

/// A question for the retrieve-and-generate endpoint
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// The user's question
    pub query: String,
    /// Collection to retrieve from
    pub collection_name: String,
    /// LLM family, e.g. `mistral`
    pub model_family: String,
    /// LLM name, e.g. `mistral-small-latest`
    pub model_name: String,
    /// Credential sent in the `api_key` param
    pub api_key: ApiKey,
    /// Template with `{context}` and `{query}` placeholders
    pub prompt: String,
    /// Prior turns, sent unaltered
    pub history: History,
}

impl QueryRequest {
    /// Create a request with the default model and prompt and no history
    pub fn new(
        query: impl Into<String>,
        collection_name: impl Into<String>,
        api_key: impl Into<ApiKey>,
    ) -> Self {
        Self {
            query: query.into(),
            collection_name: collection_name.into(),
            model_family: DEFAULT_MODEL_FAMILY.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            api_key: api_key.into(),
            prompt: DEFAULT_PROMPT.to_string(),
            history: History::new(),
        }
    }

    /// Set the model
    pub fn with_model(mut self, family: impl Into<String>, name: impl Into<String>) -> Self {
        self.model_family = family.into();
        self.model_name = name.into();
        self
    }

    /// Set the prompt template
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the conversation history
    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    /// Build the wire request
    ///
    /// Every field goes in a JSON body, nothing in the URL. `history_data`
    /// is always present, `[]` when there is no history.
    pub fn to_api_request(&self) -> Result<ApiRequest> {
        let history_data = self.history.to_wire()?;
        Ok(ApiRequest::post(endpoints::RETRIEVE_ANSWER).json(json!({
            "query": self.query,
            "model_family": self.model_family,
            "model_name": self.model_name,
            "api_key": self.api_key.expose(),
            "prompt": self.prompt,
            "collection_name": self.collection_name,
            "history_data": history_data,
        })))
    }
}

/// Sends questions to the retrieve-and-generate endpoint
pub struct QueryEngine<T: Transport + ?Sized> {
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> QueryEngine<T> {
    /// Create an engine over a shared transport
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Ask a question
    ///
    /// Returns the parsed body unmodified; read the text with
    /// [`Answer::answer`] (the `answer` field). Errors propagate as-is and
    /// no answer is ever substituted.
    pub async fn get_answer(&self, request: &QueryRequest) -> Result<Answer> {
        let api_request = request.to_api_request()?;
        tracing::debug!(
            collection = %request.collection_name,
            model = %request.model_name,
            turns = request.history.len(),
            "retrieving answer"
        );
        call(self.transport.as_ref(), api_request).await
    }
}
