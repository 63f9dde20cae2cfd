//! Generation pipeline orchestration for Atelier.
//!
//! This crate turns a classified content basis into a working interactive
//! artifact plus optional supplementary materials by sequencing generation
//! calls: specification, code, materials, and the two re-entrant flows
//! (manual specification edit and natural-language refinement). It also
//! provides the pure fenced-content extractors that recover structured
//! payloads from free-form model text, and the prompt templates every stage
//! is built from.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extract;
mod pipeline;
pub mod prompts;
mod state;

pub use extract::{extract_html, extract_json};
pub use pipeline::{PhaseCallback, Pipeline};
pub use state::{Phase, PipelineState};
