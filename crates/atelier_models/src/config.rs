//! Backend selection and credentials.
//!
//! Configuration is read once at run start and passed explicitly into each
//! pipeline run; nothing here is ambient or mutated mid-run.

use serde::{Deserialize, Serialize};

/// Default model for the chat-completion protocol.
pub const DEFAULT_OPENROUTER_MODEL: &str = "moonshotai/kimi-k2:free";

/// Default model for the multimodal-generation protocol.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Which wire protocol a run talks to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Streaming chat-completion endpoint (OpenRouter-compatible)
    OpenRouter,
    /// Streaming multimodal-generation endpoint (Gemini-compatible)
    Gemini,
}

/// Backend configuration for one run.
///
/// Credentials are supplied out-of-band (environment or explicit value) and
/// validated by the client before any network call.
///
/// # Examples
///
/// ```
/// use atelier_models::{BackendConfig, Protocol};
///
/// let config = BackendConfig::new(Protocol::Gemini, "gemini-2.0-flash")
///     .with_api_key("test-key");
/// assert!(config.has_credentials());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Selected protocol
    pub protocol: Protocol,
    /// Default model identifier for requests that do not name one
    pub model: String,
    /// API key; `None` or empty means unconfigured
    pub api_key: Option<String>,
    /// Override of the protocol's default endpoint, mainly for tests
    pub base_url: Option<String>,
}

impl BackendConfig {
    /// Create a configuration with no credentials attached.
    pub fn new(protocol: Protocol, model: impl Into<String>) -> Self {
        Self {
            protocol,
            model: model.into(),
            api_key: None,
            base_url: None,
        }
    }

    /// Read the protocol's API key from the environment
    /// (`OPENROUTER_API_KEY` or `GEMINI_API_KEY`).
    pub fn from_env(protocol: Protocol, model: impl Into<String>) -> Self {
        let var = match protocol {
            Protocol::OpenRouter => "OPENROUTER_API_KEY",
            Protocol::Gemini => "GEMINI_API_KEY",
        };
        let api_key = std::env::var(var).ok().filter(|k| !k.trim().is_empty());
        Self {
            api_key,
            ..Self::new(protocol, model)
        }
    }

    /// Attach an explicit API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// True when a non-empty API key is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}
