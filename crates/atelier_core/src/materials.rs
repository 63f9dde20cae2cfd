//! Educational-materials request supplied by the caller before a run.

use serde::{Deserialize, Serialize};

/// Which supplementary materials a run should produce.
///
/// Read-only during the run; materials are generated in a fixed order
/// (lesson plan, handout, quiz), each independently best-effort.
///
/// # Examples
///
/// ```
/// use atelier_core::MaterialsRequest;
///
/// let none = MaterialsRequest::default();
/// assert!(!none.any());
///
/// let quiz_only = MaterialsRequest { quiz: true, ..Default::default() };
/// assert!(quiz_only.any());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaterialsRequest {
    /// Generate a classroom lesson plan
    pub lesson_plan: bool,
    /// Generate a one-page student handout
    pub handout: bool,
    /// Generate a short review quiz
    pub quiz: bool,
}

impl MaterialsRequest {
    /// True when at least one material is requested.
    pub fn any(&self) -> bool {
        self.lesson_plan || self.handout || self.quiz
    }
}
