//! Trait definitions for generation backends and their capabilities.

use crate::StreamChunk;
use async_trait::async_trait;
use atelier_core::{EventSink, GenerateRequest, GenerateResponse};
use atelier_error::AtelierResult;
use futures_util::stream::Stream;
use std::pin::Pin;

/// A pinned, boxed stream of chunk results.
pub type TokenStream = Pin<Box<dyn Stream<Item = AtelierResult<StreamChunk>> + Send>>;

/// Callback invoked with each streamed token fragment.
pub type TokenCallback = dyn Fn(&str) + Send + Sync;

/// Core trait that all generation backends must implement.
///
/// This is the buffered mode: one request in, one complete normalized
/// response out. The two wire protocols (chat completion and multimodal
/// generation) are interchangeable behind this trait; protocol-specific
/// quirks stay inside the implementations.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Generate a complete response for the request.
    async fn generate(&self, req: &GenerateRequest) -> AtelierResult<GenerateResponse>;

    /// Protocol name (e.g. "openrouter", "gemini").
    fn protocol_name(&self) -> &'static str;

    /// Model identifier requests default to.
    fn model_name(&self) -> &str;
}

/// Trait for backends that support streaming responses.
#[async_trait]
pub trait StreamingBackend: TextBackend {
    /// Generate a streaming response.
    ///
    /// Yields chunks as they arrive from the API; the terminal chunk carries
    /// the finish reason and any grounding references.
    async fn generate_stream(&self, req: &GenerateRequest) -> AtelierResult<TokenStream>;
}

/// The orchestrator-facing generation capability.
///
/// One request in, one normalized response out, resolving exactly once;
/// interaction events are emitted to `sink` along the way and each streamed
/// fragment is forwarded to `on_token` when present.
#[async_trait]
pub trait GenerateText: Send + Sync {
    /// Issue one generation request.
    async fn generate(
        &self,
        req: &GenerateRequest,
        on_token: Option<&TokenCallback>,
        sink: &dyn EventSink,
    ) -> AtelierResult<GenerateResponse>;
}
