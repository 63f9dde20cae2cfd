//! Streaming multimodal-generation protocol (Gemini-compatible).
//!
//! Requests carry structured content parts (text, optional file-by-reference
//! video), a generation config (temperature, response MIME hint), safety
//! thresholds, and an optional external-search tool. Responses carry a
//! candidate list with finish reasons, prompt feedback, and optional
//! grounding metadata.

mod client;
mod dto;

pub use client::{GeminiClient, GEMINI_BASE_URL};
pub use dto::{
    Candidate, Content, FileData, GeminiRequest, GeminiResponse, GenerationConfig,
    GroundingChunk, GroundingMetadata, Part, PromptFeedback, SafetySettingDto, WebSource,
};
