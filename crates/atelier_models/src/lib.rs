//! Generation backend protocols for Atelier.
//!
//! This crate implements the two interchangeable model-serving protocols —
//! a streaming chat-completion endpoint ([`openrouter`]) and a streaming
//! multimodal-generation endpoint ([`gemini`]) — behind the traits defined in
//! `atelier_interface`, plus the [`GenerationClient`] that turns one request
//! into a normalized response while emitting an auditable interaction trace.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
pub mod gemini;
pub mod openrouter;
mod sse;

pub use client::GenerationClient;
pub use config::{BackendConfig, Protocol, DEFAULT_GEMINI_MODEL, DEFAULT_OPENROUTER_MODEL};
pub use sse::SseLineBuffer;
