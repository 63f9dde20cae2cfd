//! Transport error types.

/// Transport-level error with source location.
///
/// Covers network failures and non-success HTTP status codes from a backend.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", message, line, file)]
pub struct TransportError {
    /// Error message
    pub message: String,
    /// HTTP status code, when the failure carried one
    pub status: Option<u16>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl TransportError {
    /// Create a new TransportError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::TransportError;
    ///
    /// let err = TransportError::new("Connection refused");
    /// assert!(err.status.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            status: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a new TransportError carrying an HTTP status code.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::TransportError;
    ///
    /// let err = TransportError::with_status(503, "Service Unavailable");
    /// assert_eq!(err.status, Some(503));
    /// ```
    #[track_caller]
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            status: Some(status),
            line: location.line(),
            file: location.file(),
        }
    }
}
