//! # ragkit HTTP
//!
//! reqwest-backed transport for the ragkit client.

#![warn(missing_docs)]

// Re-export core types for convenience
pub use ragkit_core::client::RagClient;
pub use ragkit_core::config::{ApiKey, RagConfig};
pub use ragkit_core::error::{Error, Result};
pub use ragkit_core::transport::Transport;

pub mod http;

pub use http::HttpTransport;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Connection pool idle timeout
    pub pool_idle_timeout_secs: u64,
    /// Max idle connections per host
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            connect_timeout_secs: 10,
            pool_idle_timeout_secs: 90,
            pool_max_idle_per_host: 32,
        }
    }
}

impl HttpConfig {
    /// Build a reqwest client
    pub fn build_client(&self) -> Result<reqwest::Client> {
        use std::time::Duration;

        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(self.pool_idle_timeout_secs))
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .user_agent(concat!("ragkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Internal(e.to_string()))
    }
}

/// Create a client for the given configuration
pub fn connect(config: RagConfig) -> Result<RagClient<HttpTransport>> {
    Ok(RagClient::new(std::sync::Arc::new(HttpTransport::new(config)?)))
}

/// Create a client from `RAG_BASE_URL` and `RAG_API_KEY`
pub fn client_from_env() -> Result<RagClient<HttpTransport>> {
    connect(RagConfig::from_env()?)
}
