//! Mock transport for testing

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ApiRequest, Method, Transport};
use crate::error::{Error, Result};

/// A request as seen by [`MockTransport`]
pub type RecordedCall = ApiRequest;

type Scripted = Result<serde_json::Value>;

/// A scripted transport that records every request
///
/// Responses are queued per (method, path) and handed out in order. When a
/// queue holds a single response it is reused for every later call.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Create a mock with nothing scripted
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON response
    pub fn respond(self, method: Method, path: impl Into<String>, body: serde_json::Value) -> Self {
        self.push(method, path.into(), Ok(body));
        self
    }

    /// Queue a failure
    pub fn fail(self, method: Method, path: impl Into<String>, error: Error) -> Self {
        self.push(method, path.into(), Err(error));
        self
    }

    fn push(&self, method: Method, path: String, scripted: Scripted) {
        self.responses
            .lock()
            .entry((method, path))
            .or_default()
            .push_back(scripted);
    }

    /// Every request executed so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of requests executed so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Requests executed against one path
    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.path == path)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value> {
        let key = (request.method, request.path.clone());
        self.calls.lock().push(request);

        let mut responses = self.responses.lock();
        let queue = responses.get_mut(&key).ok_or_else(|| {
            Error::Internal(format!("no mock response for {} {}", key.0, key.1))
        })?;

        if queue.len() > 1 {
            queue
                .pop_front()
                .unwrap_or_else(|| Err(Error::Internal("mock queue drained".into())))
        } else {
            match queue.front() {
                Some(Ok(value)) => Ok(value.clone()),
                Some(Err(e)) => Err(replay_error(e)),
                None => Err(Error::Internal("mock queue drained".into())),
            }
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// `Error` is not `Clone`; the variants a transport can produce are rebuilt.
fn replay_error(error: &Error) -> Error {
    match error {
        Error::Transport(msg) => Error::Transport(msg.clone()),
        Error::Remote { status, body } => Error::remote(*status, body.clone()),
        Error::Decode { message, body } => Error::decode(message.clone(), body.clone()),
        other => Error::Internal(other.to_string()),
    }
}
