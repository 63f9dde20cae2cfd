//! Pipeline error types for orchestration preconditions and contracts.

/// Pipeline-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Neither a video reference nor a topic was supplied for a run
    #[display("No content basis (video reference or topic) provided")]
    NoContentBasis,
    /// The specification JSON parsed but its `spec` field was missing or not a string
    #[display("The 'spec' field in the JSON response was missing or not a string")]
    InvalidSpecField,
    /// A refinement was requested with no current specification to refine
    #[display("Cannot refine: no current specification available")]
    MissingSpecification,
}

/// Pipeline error with source location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::NoContentBasis);
/// assert!(format!("{}", err).contains("content basis"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
