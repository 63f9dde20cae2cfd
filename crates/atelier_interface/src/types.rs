//! Core type definitions for the backend interface.

use atelier_core::GroundingReference;
use serde::{Deserialize, Serialize};

/// A single chunk from a streaming response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental text content; may be empty on protocol-keepalive chunks.
    pub delta: String,
    /// Whether this is the final chunk.
    pub is_final: bool,
    /// Optional finish reason if final.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Grounding references carried by the terminal chunk, when the backend
    /// performed retrieval. Always empty for non-final chunks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding: Vec<GroundingReference>,
}

impl StreamChunk {
    /// A non-final chunk carrying only text.
    pub fn delta(text: impl Into<String>) -> Self {
        Self {
            delta: text.into(),
            ..Self::default()
        }
    }

    /// A terminal chunk with a finish reason.
    pub fn terminal(reason: FinishReason) -> Self {
        Self {
            is_final: true,
            finish_reason: Some(reason),
            ..Self::default()
        }
    }
}

/// Why generation stopped.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
pub enum FinishReason {
    /// Model completed naturally.
    Stop,
    /// Hit the output token limit.
    Length,
    /// Content was filtered by the backend's safety layer.
    ContentFilter,
    /// Backend-specific reason not covered above.
    Other(String),
}

impl FinishReason {
    /// True for the normal end-of-generation reason.
    pub fn is_normal(&self) -> bool {
        matches!(self, FinishReason::Stop)
    }
}
