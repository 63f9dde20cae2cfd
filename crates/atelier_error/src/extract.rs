//! Extraction error types.

/// Maximum number of characters of model output retained in an error preview.
const PREVIEW_LIMIT: usize = 200;

/// Error raised when structured content cannot be recovered from model text.
///
/// Carries a bounded preview of the offending text alongside the underlying
/// parse error, so malformed responses stay diagnosable without dumping the
/// whole response body into logs.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Extraction Error: {} (preview: {:?}) at line {} in {}",
    message,
    preview,
    line,
    file
)]
pub struct ExtractError {
    /// The underlying parse error message
    pub message: String,
    /// Bounded preview of the text that failed to parse
    pub preview: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ExtractError {
    /// Create a new ExtractError, truncating the preview to a bounded length.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::ExtractError;
    ///
    /// let err = ExtractError::new("expected value at line 1", "not json at all");
    /// assert!(err.preview.contains("not json"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>, text: &str) -> Self {
        let location = std::panic::Location::caller();
        let preview: String = text.chars().take(PREVIEW_LIMIT).collect();
        Self {
            message: message.into(),
            preview,
            line: location.line(),
            file: location.file(),
        }
    }
}
