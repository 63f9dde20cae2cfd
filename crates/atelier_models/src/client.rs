//! The streaming text-generation client.
//!
//! One call in, one normalized response out. The client validates
//! credentials before touching the network, dispatches to the configured
//! protocol, forwards streamed tokens, and emits the auditable interaction
//! trace: exactly one PROMPT event, zero or more TOKEN events, one RESPONSE
//! event for every completed exchange, and one ERROR event on failure. No
//! retries happen here; retry policy belongs to the caller.

use crate::gemini::GeminiClient;
use crate::openrouter::OpenRouterClient;
use crate::{BackendConfig, Protocol};
use atelier_core::{
    EventSink, FailureReport, GenerateRequest, GenerateResponse, InteractionEvent,
    InteractionPayload,
};
use atelier_error::{
    AtelierError, AtelierErrorKind, AtelierResult, ConfigError, GenerationError,
    GenerationErrorKind,
};
use async_trait::async_trait;
use atelier_interface::{FinishReason, GenerateText, StreamingBackend, TokenCallback};
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, instrument};

/// Client for one configured generation backend.
///
/// Holds no state between calls beyond the immutable configuration and a
/// shared HTTP connection pool; the backend is assembled fresh from the
/// configuration at the start of each call.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    config: BackendConfig,
    http: Client,
}

impl GenerationClient {
    /// Create a client for the given backend configuration.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// The configured backend.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Model identifier a request will be addressed to.
    fn resolve_model(&self, req: &GenerateRequest) -> String {
        if req.model.is_empty() {
            self.config.model.clone()
        } else {
            req.model.clone()
        }
    }

    fn backend(&self, api_key: &str) -> Box<dyn StreamingBackend> {
        match self.config.protocol {
            Protocol::OpenRouter => {
                let mut client =
                    OpenRouterClient::new(self.http.clone(), api_key, self.config.model.clone());
                if let Some(base) = &self.config.base_url {
                    client = client.with_base_url(base.clone());
                }
                Box::new(client)
            }
            Protocol::Gemini => {
                let mut client =
                    GeminiClient::new(self.http.clone(), api_key, self.config.model.clone());
                if let Some(base) = &self.config.base_url {
                    client = client.with_base_url(base.clone());
                }
                Box::new(client)
            }
        }
    }

    /// Emit an ERROR event for `err` and hand it back for propagation.
    fn fail(&self, sink: &dyn EventSink, model: &str, err: AtelierError) -> AtelierError {
        sink.record(InteractionEvent::now(
            model,
            InteractionPayload::Error(failure_report(&err)),
        ));
        err
    }

    async fn generate_buffered(
        &self,
        backend: &dyn StreamingBackend,
        req: &GenerateRequest,
        model: &str,
        sink: &dyn EventSink,
    ) -> AtelierResult<GenerateResponse> {
        let response = backend.generate(req).await?;

        sink.record(InteractionEvent::now(
            model,
            InteractionPayload::Response(serde_json::to_value(&response).unwrap_or_default()),
        ));

        if response.text.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into());
        }
        Ok(response)
    }

    async fn generate_streaming(
        &self,
        backend: &dyn StreamingBackend,
        req: &GenerateRequest,
        model: &str,
        on_token: Option<&TokenCallback>,
        sink: &dyn EventSink,
    ) -> AtelierResult<GenerateResponse> {
        let mut stream = backend.generate_stream(req).await?;

        let mut text = String::new();
        let mut grounding = Vec::new();
        let mut finish: Option<FinishReason> = None;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if !chunk.delta.is_empty() {
                text.push_str(&chunk.delta);
                if let Some(callback) = on_token {
                    callback(&chunk.delta);
                }
                sink.record(InteractionEvent::now(
                    model,
                    InteractionPayload::Token(chunk.delta.clone()),
                ));
            }
            if chunk.is_final {
                finish = chunk.finish_reason;
                grounding = chunk.grounding;
            }
        }

        let response = GenerateResponse { text, grounding };
        sink.record(InteractionEvent::now(
            model,
            InteractionPayload::Response(serde_json::to_value(&response).unwrap_or_default()),
        ));
        debug!(
            chars = response.text.len(),
            grounding = response.grounding.len(),
            finish = ?finish,
            "Stream complete"
        );

        match finish {
            Some(FinishReason::ContentFilter) => Err(GenerationError::new(
                GenerationErrorKind::ContentBlocked("content filter".to_string()),
            )
            .into()),
            Some(reason) if !reason.is_normal() => {
                Err(GenerationError::new(GenerationErrorKind::AbnormalStop {
                    reason: reason.to_string(),
                    partial_text: response.text,
                })
                .into())
            }
            _ if response.text.is_empty() => {
                Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into())
            }
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl GenerateText for GenerationClient {
    /// Issue one generation request.
    ///
    /// Resolves exactly once on success or fails with exactly one error.
    /// When `req.streaming` is set, each non-empty content fragment is
    /// forwarded to `on_token` and emitted as a TOKEN event before the final
    /// accumulation is returned; otherwise the call waits for one complete
    /// body and emits no TOKEN events.
    #[instrument(skip(self, req, on_token, sink), fields(protocol = %self.config.protocol, streaming = req.streaming))]
    async fn generate(
        &self,
        req: &GenerateRequest,
        on_token: Option<&TokenCallback>,
        sink: &dyn EventSink,
    ) -> AtelierResult<GenerateResponse> {
        let model = self.resolve_model(req);

        // Credential check comes before any network call and before the
        // PROMPT event: an unconfigured backend never sees the request.
        let Some(api_key) = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
        else {
            let err = ConfigError::new(format!(
                "API key for {} backend is missing or empty",
                self.config.protocol
            ));
            return Err(self.fail(sink, &model, err.into()));
        };
        let backend = self.backend(api_key);

        sink.record(InteractionEvent::now(
            &model,
            InteractionPayload::Prompt(req.clone()),
        ));

        let result = if req.streaming {
            self.generate_streaming(backend.as_ref(), req, &model, on_token, sink)
                .await
        } else {
            self.generate_buffered(backend.as_ref(), req, &model, sink)
                .await
        };

        match result {
            Ok(response) => Ok(response),
            Err(err) => Err(self.fail(sink, &model, err)),
        }
    }
}

/// Structured failure description for an ERROR event.
fn failure_report(err: &AtelierError) -> FailureReport {
    let kind = match err.kind() {
        AtelierErrorKind::Config(_) => "Configuration",
        AtelierErrorKind::Transport(_) => "Transport",
        AtelierErrorKind::Generation(inner) => match inner.kind {
            GenerationErrorKind::ContentBlocked(_) => "ContentBlocked",
            GenerationErrorKind::EmptyResponse => "EmptyResponse",
            GenerationErrorKind::AbnormalStop { .. } => "AbnormalStop",
        },
        AtelierErrorKind::Extract(_) => "Extraction",
        AtelierErrorKind::Pipeline(_) => "Pipeline",
    };
    FailureReport {
        kind: kind.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{GenerateRequestBuilder, InteractionLog};
    use atelier_interface::{StreamChunk, TextBackend, TokenStream};

    /// Backend that replays a scripted chunk sequence.
    struct ScriptedBackend {
        chunks: Vec<StreamChunk>,
    }

    #[async_trait]
    impl TextBackend for ScriptedBackend {
        async fn generate(&self, _req: &GenerateRequest) -> AtelierResult<GenerateResponse> {
            let text = self.chunks.iter().map(|c| c.delta.as_str()).collect();
            Ok(GenerateResponse {
                text,
                grounding: Vec::new(),
            })
        }

        fn protocol_name(&self) -> &'static str {
            "scripted"
        }

        fn model_name(&self) -> &str {
            "scripted-model"
        }
    }

    #[async_trait]
    impl StreamingBackend for ScriptedBackend {
        async fn generate_stream(&self, _req: &GenerateRequest) -> AtelierResult<TokenStream> {
            let chunks = self.chunks.clone();
            Ok(Box::pin(futures_util::stream::iter(
                chunks.into_iter().map(Ok),
            )))
        }
    }

    fn payload_kinds(log: &InteractionLog) -> Vec<&'static str> {
        log.snapshot()
            .into_iter()
            .map(|e| match e.payload {
                InteractionPayload::Prompt(_) => "prompt",
                InteractionPayload::Token(_) => "token",
                InteractionPayload::Response(_) => "response",
                InteractionPayload::Error(_) => "error",
            })
            .collect()
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_event_but_the_error() {
        let client =
            GenerationClient::new(BackendConfig::new(Protocol::OpenRouter, "test/model"));
        let log = InteractionLog::default();
        let req = GenerateRequestBuilder::default()
            .prompt("hi")
            .build()
            .unwrap();

        let err = client.generate(&req, None, &log).await.unwrap_err();
        assert!(matches!(err.kind(), AtelierErrorKind::Config(_)));
        assert_eq!(payload_kinds(&log), ["error"]);
    }

    #[tokio::test]
    async fn streaming_emits_prompt_tokens_response_in_order() {
        let client = GenerationClient::new(
            BackendConfig::new(Protocol::OpenRouter, "test/model").with_api_key("k"),
        );
        let backend = ScriptedBackend {
            chunks: vec![
                StreamChunk::delta("Hello "),
                StreamChunk::delta("world"),
                StreamChunk::terminal(FinishReason::Stop),
            ],
        };
        let log = InteractionLog::default();
        let req = GenerateRequestBuilder::default()
            .prompt("hi")
            .streaming(true)
            .build()
            .unwrap();

        let collected = std::sync::Arc::new(std::sync::Mutex::new(String::new()));
        let on_token = {
            let collected = std::sync::Arc::clone(&collected);
            move |t: &str| collected.lock().unwrap().push_str(t)
        };

        let response = {
            // Drive the streaming path directly against the scripted backend.
            let sink: &dyn EventSink = &log;
            client
                .generate_streaming(&backend, &req, "test/model", Some(&on_token), sink)
                .await
                .unwrap()
        };

        assert_eq!(response.text, "Hello world");
        assert_eq!(*collected.lock().unwrap(), "Hello world");
        assert_eq!(payload_kinds(&log), ["token", "token", "response"]);
    }

    #[tokio::test]
    async fn truncated_stream_fails_with_partial_text() {
        let client = GenerationClient::new(
            BackendConfig::new(Protocol::OpenRouter, "test/model").with_api_key("k"),
        );
        let backend = ScriptedBackend {
            chunks: vec![
                StreamChunk::delta("partial"),
                StreamChunk::terminal(FinishReason::Length),
            ],
        };
        let log = InteractionLog::default();
        let req = GenerateRequestBuilder::default()
            .prompt("hi")
            .streaming(true)
            .build()
            .unwrap();

        let err = client
            .generate_streaming(&backend, &req, "test/model", None, &log)
            .await
            .unwrap_err();
        match err.kind() {
            AtelierErrorKind::Generation(inner) => {
                assert_eq!(inner.partial_text(), Some("partial"));
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_stream_is_an_empty_response() {
        let client = GenerationClient::new(
            BackendConfig::new(Protocol::Gemini, "test-model").with_api_key("k"),
        );
        let backend = ScriptedBackend {
            chunks: vec![StreamChunk::terminal(FinishReason::Stop)],
        };
        let log = InteractionLog::default();
        let req = GenerateRequestBuilder::default()
            .prompt("hi")
            .streaming(true)
            .build()
            .unwrap();

        let err = client
            .generate_streaming(&backend, &req, "test-model", None, &log)
            .await
            .unwrap_err();
        match err.kind() {
            AtelierErrorKind::Generation(inner) => {
                assert_eq!(inner.kind, GenerationErrorKind::EmptyResponse);
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }
}
