//! Wire types for the chat-completion protocol.

use atelier_core::GenerateRequest;
use serde::{Deserialize, Serialize};

/// One message in the outbound conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role ("user", "assistant", "system")
    pub role: String,
    /// Message text
    pub content: String,
}

/// Outbound chat-completion request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Optional output token cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Request incremental chunks instead of one body
    pub stream: bool,
}

impl ChatRequest {
    /// Assemble the wire request from a generation request.
    ///
    /// The base prompt and any appended context become a single user message,
    /// matching how later pipeline stages compose fresh prompts from prior
    /// results rather than threading conversation history.
    pub fn from_request(req: &GenerateRequest, model: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: req.full_prompt(),
            }],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            stream: req.streaming,
        }
    }
}

/// One candidate in a buffered response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChoice {
    /// The complete assistant message
    pub message: ChatMessage,
    /// Why generation stopped ("stop", "length", ...)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Buffered chat-completion response body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Candidate outputs; the first is used
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// Incremental content inside one streamed chunk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatDelta {
    /// Text fragment, absent on role-only or keepalive chunks
    #[serde(default)]
    pub content: Option<String>,
}

/// One candidate slot inside a streamed chunk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatStreamChoice {
    /// Incremental content
    #[serde(default)]
    pub delta: ChatDelta,
    /// Present on the terminal chunk
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// One streamed chunk body (the payload of a `data:` line).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    /// Candidate slots; the first is used
    #[serde(default)]
    pub choices: Vec<ChatStreamChoice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::GenerateRequestBuilder;

    #[test]
    fn request_wire_shape() {
        let req = GenerateRequestBuilder::default()
            .prompt("hello")
            .additional_context("world")
            .streaming(true)
            .build()
            .unwrap();
        let wire = ChatRequest::from_request(&req, "test/model");
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["model"], "test/model");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello\n\nworld");
        assert_eq!(json["stream"], true);
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn stream_chunk_parses_delta() {
        let chunk: ChatStreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hi"));
        assert!(chunk.choices[0].finish_reason.is_none());
    }

    #[test]
    fn terminal_chunk_parses_finish_reason() {
        let chunk: ChatStreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#).unwrap();
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
    }
}
