//! Client configuration

use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::transport::Root;

/// Host of the hosted hackathon RAG service; `/api/app/...` paths hang off it
pub const DEFAULT_BASE_URL: &str = "https://hackathon-ia-et-crise.fr";
/// Where the chatbot front (the back app endpoint) lives below the host
pub const CHATBOT_PREFIX: &str = "/reminai/chatbot";

/// Environment variable holding the service base URL
pub const BASE_URL_ENV: &str = "RAG_BASE_URL";
/// Environment variable overriding the chatbot root
pub const CHATBOT_URL_ENV: &str = "RAG_CHATBOT_URL";
/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "RAG_API_KEY";
/// Fallback credential variable used by the hackathon templates
pub const MISTRAL_API_KEY_ENV: &str = "MISTRAL_API_KEY";

pub(crate) const REDACTED: &str = "[REDACTED]";

/// A secret API credential
///
/// `Debug` and `Display` never print the value. Call [`ApiKey::expose`] only
/// where the key is written onto the wire.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw credential
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw credential value
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the credential is blank
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&REDACTED).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Connection settings for the remote RAG service
///
/// The RAG API and the chatbot front are served from two roots on the same
/// host. `chatbot_url` defaults to `base_url` + [`CHATBOT_PREFIX`].
#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    /// RAG API root, e.g. `https://host`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chatbot front root, e.g. `https://host/reminai/chatbot`
    #[serde(default)]
    pub chatbot_url: Option<String>,
    /// Credential sent as a bearer token on every call
    #[serde(default)]
    pub api_key: Option<ApiKey>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chatbot_url: None,
            api_key: None,
        }
    }
}

impl RagConfig {
    /// Create a config for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.into())?,
            chatbot_url: None,
            api_key: None,
        })
    }

    /// Serve the chatbot front from somewhere other than the default prefix
    pub fn with_chatbot_url(mut self, chatbot_url: impl Into<String>) -> Result<Self> {
        self.chatbot_url = Some(normalize_base_url(chatbot_url.into())?);
        Ok(self)
    }

    /// Attach a credential
    pub fn with_api_key(mut self, api_key: impl Into<ApiKey>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.is_empty()).then_some(key);
        self
    }

    /// Build from `RAG_BASE_URL`, `RAG_CHATBOT_URL` and `RAG_API_KEY` (or
    /// `MISTRAL_API_KEY`)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| default_base_url());
        let api_key = std::env::var(API_KEY_ENV)
            .or_else(|_| std::env::var(MISTRAL_API_KEY_ENV))
            .ok();

        let mut config = Self::new(base_url)?;
        if let Ok(chatbot_url) = std::env::var(CHATBOT_URL_ENV) {
            config = config.with_chatbot_url(chatbot_url)?;
        }
        Ok(match api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        })
    }

    /// Credential, or a config error when none is set
    pub fn require_api_key(&self) -> Result<&ApiKey> {
        self.api_key.as_ref().ok_or_else(|| {
            Error::config(format!("{} or {} not set", API_KEY_ENV, MISTRAL_API_KEY_ENV))
        })
    }

    /// Root the chatbot front is served from
    pub fn chatbot_root(&self) -> String {
        match &self.chatbot_url {
            Some(url) => url.clone(),
            None => format!("{}{}", self.base_url, CHATBOT_PREFIX),
        }
    }

    /// Full URL of an endpoint path under the given root
    pub fn endpoint(&self, root: Root, path: &str) -> String {
        let path = path.trim_start_matches('/');
        match root {
            Root::Api => format!("{}/{}", self.base_url, path),
            Root::Chatbot => format!("{}/{}", self.chatbot_root(), path),
        }
    }

    /// Validate a config that was deserialized rather than built with `new`
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(self.base_url)?,
            chatbot_url: self.chatbot_url.map(normalize_base_url).transpose()?,
            api_key: self.api_key.filter(|k| !k.is_empty()),
        })
    }
}

fn normalize_base_url(url: String) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::config(format!(
            "base url must start with http:// or https://, got '{}'",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}
