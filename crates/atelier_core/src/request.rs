//! Request and response types for text generation.

use crate::SafetyPolicy;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Hint for the shape of the response body.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Free text (default)
    #[default]
    Text,
    /// Strict JSON body
    Json,
}

/// One generation request, constructed fresh per call.
///
/// Later calls compose new prompts from prior results; a request object is
/// never reused across calls.
///
/// # Examples
///
/// ```
/// use atelier_core::{GenerateRequestBuilder, ResponseFormat};
///
/// let request = GenerateRequestBuilder::default()
///     .model("gemini-2.0-flash")
///     .prompt("Write a spec for an interactive app about tides.")
///     .response_format(ResponseFormat::Json)
///     .streaming(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.temperature, 0.75);
/// assert!(!request.use_search);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct GenerateRequest {
    /// Backend model identifier
    pub model: String,
    /// Base prompt text
    pub prompt: String,
    /// Video to attach by reference, for backends that accept one
    pub video_reference: Option<String>,
    /// Free-text context appended after the base prompt
    pub additional_context: Option<String>,
    /// Decoding temperature
    pub temperature: f32,
    /// Optional output token cap
    pub max_tokens: Option<u32>,
    /// Response-format hint
    pub response_format: ResponseFormat,
    /// Enable the backend's external-search tool, where supported
    pub use_search: bool,
    /// Safety thresholds forwarded to the backend
    pub safety: SafetyPolicy,
    /// Stream incremental tokens instead of waiting for one body
    pub streaming: bool,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            model: String::new(),
            prompt: String::new(),
            video_reference: None,
            additional_context: None,
            temperature: 0.75,
            max_tokens: None,
            response_format: ResponseFormat::Text,
            use_search: false,
            safety: SafetyPolicy::default(),
            streaming: false,
        }
    }
}

impl GenerateRequest {
    /// The full prompt: base text plus the appended free-text context, if any.
    pub fn full_prompt(&self) -> String {
        match &self.additional_context {
            Some(extra) => format!("{}\n\n{}", self.prompt, extra),
            None => self.prompt.clone(),
        }
    }
}

/// A citation returned by a backend that performed retrieval while
/// producing a response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroundingReference {
    /// Human-readable source title
    pub title: String,
    /// Source URI
    pub uri: String,
}

/// The normalized response object.
///
/// # Examples
///
/// ```
/// use atelier_core::GenerateResponse;
///
/// let response = GenerateResponse {
///     text: "Hello! How can I help?".to_string(),
///     grounding: Vec::new(),
/// };
/// assert!(!response.has_grounding());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The accumulated response text
    pub text: String,
    /// Grounding references, when the backend performed retrieval
    pub grounding: Vec<GroundingReference>,
}

impl GenerateResponse {
    /// True when the backend returned at least one grounding reference.
    pub fn has_grounding(&self) -> bool {
        !self.grounding.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let req = GenerateRequestBuilder::default()
            .model("m")
            .prompt("p")
            .build()
            .unwrap();
        assert_eq!(req.temperature, 0.75);
        assert_eq!(req.response_format, ResponseFormat::Text);
        assert!(!req.streaming);
        assert!(req.video_reference.is_none());
    }

    #[test]
    fn full_prompt_appends_context() {
        let req = GenerateRequestBuilder::default()
            .prompt("base")
            .additional_context("extra")
            .build()
            .unwrap();
        assert_eq!(req.full_prompt(), "base\n\nextra");
    }
}
