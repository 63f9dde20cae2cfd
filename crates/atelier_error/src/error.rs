//! Top-level error wrapper types.

use crate::{ConfigError, ExtractError, GenerationError, PipelineError, TransportError};

/// The foundation error enum for the Atelier workspace.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierError, TransportError};
///
/// let transport_err = TransportError::new("Connection failed");
/// let err: AtelierError = transport_err.into();
/// assert!(format!("{}", err).contains("Transport Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AtelierErrorKind {
    /// Configuration error (missing credentials, invalid backend settings)
    #[from(ConfigError)]
    Config(ConfigError),
    /// Transport error (network or HTTP failure)
    #[from(TransportError)]
    Transport(TransportError),
    /// Generation error (blocked, empty, or abnormally stopped response)
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Extraction error (structured content not recoverable from model text)
    #[from(ExtractError)]
    Extract(ExtractError),
    /// Pipeline error (orchestration precondition or contract violation)
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Atelier error with kind discrimination.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierResult, ConfigError};
///
/// fn might_fail() -> AtelierResult<()> {
///     Err(ConfigError::new("Missing API key"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Atelier Error: {}", _0)]
pub struct AtelierError(Box<AtelierErrorKind>);

impl AtelierError {
    /// Create a new error from a kind.
    pub fn new(kind: AtelierErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AtelierErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to AtelierErrorKind
impl<T> From<T> for AtelierError
where
    T: Into<AtelierErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Atelier operations.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierResult, TransportError};
///
/// fn fetch_data() -> AtelierResult<String> {
///     Err(TransportError::new("404 Not Found"))?
/// }
/// ```
pub type AtelierResult<T> = std::result::Result<T, AtelierError>;
