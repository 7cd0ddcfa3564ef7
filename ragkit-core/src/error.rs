//! Error types for the ragkit client

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using ragkit's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ragkit client
///
/// None of these are recovered inside the client. Every component hands the
/// failure back to its caller with the status code and body intact.
#[derive(Debug, Error)]
pub enum Error {
    // ============ Remote Call Errors ============
    /// The request went out but no response came back (connection, DNS,
    /// timeout, broken body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a status outside the 2xx range
    #[error("Remote error {status}: {body}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The service answered 2xx but the body could not be read
    #[error("Decode error: {message}")]
    Decode {
        /// What went wrong
        message: String,
        /// Raw response body
        body: String,
    },

    // ============ Local Precondition Errors ============
    /// A local file expected to exist does not
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// History or request serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    // ============ System Errors ============
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============ Generic Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // The URL is stripped from the message; query strings can carry
        // the api key.
        let is_builder = e.is_builder();
        let message = e.without_url().to_string();
        if is_builder {
            // Nothing was sent
            Self::Internal(format!("request could not be built: {}", message))
        } else {
            Self::Transport(message)
        }
    }
}

impl Error {
    /// Create a new remote error
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Create a new decode error
    pub fn decode(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: body.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status carried by a remote error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is a 4xx answer from the service
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }

    /// Check if this error is retryable
    ///
    /// The client never retries on its own; this is for callers that want to.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_status_helpers() {
        let err = Error::remote(404, r#"{"detail":"Collection not found"}"#);
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_retryable());

        let err = Error::remote(503, "unavailable");
        assert!(!err.is_client_error());
        assert!(err.is_retryable());

        assert!(Error::remote(429, "slow down").is_retryable());
    }

    #[test]
    fn test_local_errors_not_retryable() {
        assert!(!Error::NotFound(PathBuf::from("rules.pdf")).is_retryable());
        assert!(!Error::decode("expected value", "<html>").is_retryable());
        assert!(Error::Transport("connection refused".into()).is_retryable());
        assert_eq!(Error::config("missing").status(), None);
    }

    #[test]
    fn test_display_keeps_body() {
        let err = Error::remote(409, "Collection already exists");
        assert_eq!(err.to_string(), "Remote error 409: Collection already exists");
    }
}
