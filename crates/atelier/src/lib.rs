//! Atelier - Interactive Learning App Generation
//!
//! Atelier turns a single user seed (a video link, a topic, or both) into an
//! interactive single-file HTML learning app plus optional educational
//! materials (lesson plan, handout, review quiz) by orchestrating streaming
//! LLM generation calls over two interchangeable wire protocols.
//!
//! # Layers
//!
//! - Error taxonomy: [`AtelierError`] and friends.
//! - Core data: [`classify`] / [`ContentBasis`], the generation
//!   request/response types, safety policy, and the bounded
//!   [`InteractionLog`].
//! - Backend seam: [`TextBackend`] / [`StreamingBackend`] and the
//!   orchestrator-facing [`GenerateText`].
//! - Protocols: [`GenerationClient`] over the chat-completion and
//!   multimodal-generation backends.
//! - Orchestration: [`Pipeline`] with its phase machine, fenced-content
//!   extraction, and prompt templates.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use atelier::{
//!     classify, BackendConfig, GenerationClient, InteractionLog, MaterialsRequest, Pipeline,
//!     Protocol, DEFAULT_GEMINI_MODEL,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BackendConfig::from_env(Protocol::Gemini, DEFAULT_GEMINI_MODEL);
//!     let log = Arc::new(InteractionLog::default());
//!     let mut pipeline = Pipeline::new(GenerationClient::new(config), log);
//!
//!     let basis = classify("https://youtu.be/dQw4w9WgXcQ explain rickrolling");
//!     pipeline.start_run(&basis, MaterialsRequest::default()).await?;
//!     println!("{}", pipeline.state().code().as_deref().unwrap_or(""));
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use atelier_core::{
    classify, embed_url, video_id, ContentBasis, EventSink, FailureReport, GenerateRequest,
    GenerateRequestBuilder, GenerateResponse, GroundingReference, HarmBlockThreshold,
    HarmCategory, InteractionEvent, InteractionLog, InteractionPayload, MaterialsRequest,
    NullSink, ResponseFormat, SafetyPolicy, SafetySetting, DEFAULT_LOG_CAPACITY,
};
pub use atelier_error::{
    AtelierError, AtelierErrorKind, AtelierResult, ConfigError, ExtractError, GenerationError,
    GenerationErrorKind, PipelineError, PipelineErrorKind, TransportError,
};
pub use atelier_interface::{
    FinishReason, GenerateText, StreamChunk, StreamingBackend, TextBackend, TokenCallback,
    TokenStream,
};
pub use atelier_models::{
    BackendConfig, GenerationClient, Protocol, DEFAULT_GEMINI_MODEL, DEFAULT_OPENROUTER_MODEL,
};
pub use atelier_pipeline::{
    extract_html, extract_json, prompts, Phase, PhaseCallback, Pipeline, PipelineState,
};
