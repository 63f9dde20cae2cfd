//! Error types for the Atelier generation pipeline.
//!
//! This crate provides the foundation error types used throughout the Atelier
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use atelier_error::{AtelierResult, TransportError};
//!
//! fn fetch_data() -> AtelierResult<String> {
//!     Err(TransportError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod extract;
mod generation;
mod pipeline;
mod transport;

pub use config::ConfigError;
pub use error::{AtelierError, AtelierErrorKind, AtelierResult};
pub use extract::ExtractError;
pub use generation::{GenerationError, GenerationErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use transport::TransportError;
