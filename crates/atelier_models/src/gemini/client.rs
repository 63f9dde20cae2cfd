//! Multimodal-generation protocol client.

use crate::gemini::dto::{GeminiRequest, GeminiResponse};
use crate::SseLineBuffer;
use async_trait::async_trait;
use atelier_core::{GenerateRequest, GenerateResponse};
use atelier_error::{AtelierResult, GenerationError, GenerationErrorKind, TransportError};
use atelier_interface::{FinishReason, StreamChunk, StreamingBackend, TextBackend, TokenStream};
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, instrument};

/// Default multimodal-generation endpoint root.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for a Gemini-compatible multimodal-generation endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client with an explicit API key and default model.
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    /// Override the endpoint root URL (mainly for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn resolve_model<'a>(&'a self, req: &'a GenerateRequest) -> &'a str {
        if req.model.is_empty() {
            &self.model
        } else {
            &req.model
        }
    }

    fn map_finish_reason(reason: &str) -> FinishReason {
        match reason {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::Length,
            "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" => FinishReason::ContentFilter,
            other => FinishReason::Other(other.to_string()),
        }
    }

    async fn send(&self, req: &GenerateRequest, method: &str) -> AtelierResult<reqwest::Response> {
        let model = self.resolve_model(req);
        let url = format!("{}/{}:{}", self.base_url, model, method);
        let wire = GeminiRequest::from_request(req);
        debug!(url = %url, model = %model, "Sending multimodal-generation request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&wire)
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::with_status(
                status.as_u16(),
                format!("Multimodal endpoint returned {status}: {body}"),
            )
            .into());
        }
        Ok(response)
    }

    /// Check a parsed body for a prompt-level moderation block.
    fn check_blocked(body: &GeminiResponse) -> AtelierResult<()> {
        if let Some(feedback) = &body.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(GenerationError::new(GenerationErrorKind::ContentBlocked(
                    reason.clone(),
                ))
                .into());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TextBackend for GeminiClient {
    #[instrument(skip(self, req), fields(protocol = "gemini", model = %self.model))]
    async fn generate(&self, req: &GenerateRequest) -> AtelierResult<GenerateResponse> {
        let response = self.send(req, "generateContent").await?;
        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| TransportError::new(format!("Failed to parse response body: {e}")))?;

        Self::check_blocked(&body)?;

        let Some(candidate) = body.candidates.first() else {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into());
        };

        let text = candidate.text();
        if let Some(reason) = candidate.finish_reason.as_deref() {
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
                    partial_text: text,
                })
                .into());
            }
        }

        let grounding = candidate
            .grounding_metadata
            .as_ref()
            .map(|meta| meta.references())
            .unwrap_or_default();

        Ok(GenerateResponse { text, grounding })
    }

    fn protocol_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl StreamingBackend for GeminiClient {
    #[instrument(skip(self, req), fields(protocol = "gemini", model = %self.model))]
    async fn generate_stream(&self, req: &GenerateRequest) -> AtelierResult<TokenStream> {
        let response = self.send(req, "streamGenerateContent?alt=sse").await?;
        let mut bytes = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut lines = SseLineBuffer::default();
            let mut finish: Option<FinishReason> = None;
            let mut grounding = Vec::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(TransportError::new(format!("Stream read failed: {e}")).into());
                        return;
                    }
                };
                for payload in lines.push(&chunk) {
                    let parsed: GeminiResponse = match serde_json::from_str(&payload) {
                        Ok(parsed) => parsed,
                        Err(e) => {
                            debug!(error = %e, "Skipping unparseable stream chunk");
                            continue;
                        }
                    };
                    if let Err(e) = Self::check_blocked(&parsed) {
                        yield Err(e);
                        return;
                    }
                    let Some(candidate) = parsed.candidates.first() else { continue };
                    if let Some(reason) = candidate.finish_reason.as_deref() {
                        finish = Some(Self::map_finish_reason(reason));
                    }
                    if let Some(meta) = &candidate.grounding_metadata {
                        grounding = meta.references();
                    }
                    let text = candidate.text();
                    if !text.is_empty() {
                        yield Ok(StreamChunk::delta(text));
                    }
                }
            }
            yield Ok(StreamChunk {
                is_final: true,
                finish_reason: Some(finish.unwrap_or(FinishReason::Stop)),
                grounding,
                ..StreamChunk::default()
            });
        };

        Ok(Box::pin(stream))
    }
}
