//! Generation error types for backend responses.

/// Conditions under which a completed backend response is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The backend reported a moderation/safety block
    #[display("Content blocked by the backend: {}", _0)]
    ContentBlocked(String),
    /// The backend returned no candidate outputs or an empty body
    #[display("Backend returned no usable text")]
    EmptyResponse,
    /// A candidate stopped for a non-normal reason other than safety
    #[display("Generation stopped abnormally ({reason}); {} chars of partial text", partial_text.len())]
    AbnormalStop {
        /// The backend's finish reason (e.g. "MAX_TOKENS")
        reason: String,
        /// Whatever text was produced before the stop
        partial_text: String,
    },
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("no usable text"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Partial text recovered before an abnormal stop, if any.
    pub fn partial_text(&self) -> Option<&str> {
        match &self.kind {
            GenerationErrorKind::AbnormalStop { partial_text, .. } => Some(partial_text),
            _ => None,
        }
    }
}
