//! Trait definitions for Atelier generation backends.
//!
//! This crate provides the seam between the orchestrator and the
//! interchangeable model-serving protocols: a buffered generation trait, a
//! streaming extension, and the chunk/finish-reason types both share.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{GenerateText, StreamingBackend, TextBackend, TokenCallback, TokenStream};
pub use types::{FinishReason, StreamChunk};
