//! Chat-completion protocol client.

use crate::openrouter::dto::{ChatRequest, ChatResponse, ChatStreamChunk};
use crate::SseLineBuffer;
use async_trait::async_trait;
use atelier_core::{GenerateRequest, GenerateResponse};
use atelier_error::{AtelierResult, GenerationError, GenerationErrorKind, TransportError};
use atelier_interface::{FinishReason, StreamChunk, StreamingBackend, TextBackend, TokenStream};
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Default chat-completion endpoint.
pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Client for an OpenRouter-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    /// Create a client with an explicit API key and default model.
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: OPENROUTER_CHAT_URL.to_string(),
            model: model.into(),
        }
    }

    /// Override the endpoint URL (mainly for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn map_finish_reason(reason: &str) -> FinishReason {
        match reason {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            other => FinishReason::Other(other.to_string()),
        }
    }

    async fn send(&self, wire: &ChatRequest) -> AtelierResult<reqwest::Response> {
        debug!(url = %self.base_url, model = %wire.model, stream = wire.stream, "Sending chat-completion request");
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(wire)
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::with_status(
                status.as_u16(),
                format!("Chat-completion endpoint returned {status}: {body}"),
            )
            .into());
        }
        Ok(response)
    }

    fn assemble(&self, req: &GenerateRequest) -> ChatRequest {
        if req.video_reference.is_some() {
            warn!("Chat-completion protocol cannot attach a video reference; ignoring it");
        }
        let model = if req.model.is_empty() {
            &self.model
        } else {
            &req.model
        };
        ChatRequest::from_request(req, model)
    }
}

#[async_trait]
impl TextBackend for OpenRouterClient {
    #[instrument(skip(self, req), fields(protocol = "openrouter", model = %self.model))]
    async fn generate(&self, req: &GenerateRequest) -> AtelierResult<GenerateResponse> {
        let mut wire = self.assemble(req);
        wire.stream = false;

        let response = self.send(&wire).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| TransportError::new(format!("Failed to parse response body: {e}")))?;

        let Some(choice) = body.choices.first() else {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into());
        };

        if let Some(reason) = choice.finish_reason.as_deref() {
            let finish = Self::map_finish_reason(reason);
            if finish == FinishReason::ContentFilter {
                return Err(GenerationError::new(GenerationErrorKind::ContentBlocked(
                    reason.to_string(),
                ))
                .into());
            }
            if !finish.is_normal() {
                return Err(GenerationError::new(GenerationErrorKind::AbnormalStop {
                    reason: reason.to_string(),
                    partial_text: choice.message.content.clone(),
                })
                .into());
            }
        }

        Ok(GenerateResponse {
            text: choice.message.content.clone(),
            grounding: Vec::new(),
        })
    }

    fn protocol_name(&self) -> &'static str {
        "openrouter"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl StreamingBackend for OpenRouterClient {
    #[instrument(skip(self, req), fields(protocol = "openrouter", model = %self.model))]
    async fn generate_stream(&self, req: &GenerateRequest) -> AtelierResult<TokenStream> {
        let mut wire = self.assemble(req);
        wire.stream = true;

        let response = self.send(&wire).await?;
        let mut bytes = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut lines = SseLineBuffer::default();
            let mut finish: Option<FinishReason> = None;
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(TransportError::new(format!("Stream read failed: {e}")).into());
                        return;
                    }
                };
                for payload in lines.push(&chunk) {
                    if payload == "[DONE]" {
                        yield Ok(StreamChunk {
                            is_final: true,
                            finish_reason: Some(finish.take().unwrap_or(FinishReason::Stop)),
                            ..StreamChunk::default()
                        });
                        return;
                    }
                    let parsed: ChatStreamChunk = match serde_json::from_str(&payload) {
                        Ok(parsed) => parsed,
                        Err(e) => {
                            debug!(error = %e, "Skipping unparseable stream chunk");
                            continue;
                        }
                    };
                    let Some(choice) = parsed.choices.first() else { continue };
                    if let Some(reason) = choice.finish_reason.as_deref() {
                        finish = Some(Self::map_finish_reason(reason));
                    }
                    if let Some(content) = choice.delta.content.as_deref() {
                        if !content.is_empty() {
                            yield Ok(StreamChunk::delta(content));
                        }
                    }
                }
            }
            // Stream ended without a [DONE] sentinel; surface what we know.
            yield Ok(StreamChunk {
                is_final: true,
                finish_reason: Some(finish.unwrap_or(FinishReason::Stop)),
                ..StreamChunk::default()
            });
        };

        Ok(Box::pin(stream))
    }
}
