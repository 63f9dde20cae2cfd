//! Core data types for the Atelier generation pipeline.
//!
//! This crate provides the foundation data types used across all Atelier
//! interfaces: the classified content basis that seeds a run, generation
//! requests and responses, safety policy, the interaction-event trace, and
//! the educational-materials request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod basis;
mod event;
mod materials;
mod request;
mod safety;

pub use basis::{classify, embed_url, video_id, ContentBasis};
pub use event::{
    EventSink, FailureReport, InteractionEvent, InteractionLog, InteractionPayload, NullSink,
    DEFAULT_LOG_CAPACITY,
};
pub use materials::MaterialsRequest;
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, GroundingReference, ResponseFormat,
};
pub use safety::{HarmBlockThreshold, HarmCategory, SafetyPolicy, SafetySetting};
