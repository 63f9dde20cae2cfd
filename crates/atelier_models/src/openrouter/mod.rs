//! Streaming chat-completion protocol (OpenRouter-compatible).
//!
//! Requests carry a model id, a message list, a temperature, and a stream
//! flag. Streamed responses arrive as `data:` SSE lines terminated by a
//! `[DONE]` sentinel. This protocol exposes no grounding references.

mod client;
mod dto;

pub use client::{OpenRouterClient, OPENROUTER_CHAT_URL};
pub use dto::{
    ChatChoice, ChatDelta, ChatMessage, ChatRequest, ChatResponse, ChatStreamChoice,
    ChatStreamChunk,
};
