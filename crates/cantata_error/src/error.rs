//! Top-level error wrapper types.

use crate::{BackendError, ConfigError, OutputError, RunError, TemplateError};

/// Every error condition a Cantata operation can report.
///
/// # Examples
///
/// ```
/// use cantata_error::{BackendError, CantataError};
///
/// let backend = BackendError::new("connection reset");
/// let err: CantataError = backend.into();
/// assert!(format!("{}", err).contains("Backend Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CantataErrorKind {
    /// Completion backend failure
    #[from(BackendError)]
    Backend(BackendError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Malformed output addressing
    #[from(OutputError)]
    Output(OutputError),
    /// Template construction failure
    #[from(TemplateError)]
    Template(TemplateError),
    /// Run lifecycle misuse
    #[from(RunError)]
    Run(RunError),
}

/// Cantata error with kind discrimination.
///
/// # Examples
///
/// ```
/// use cantata_error::{CantataErrorKind, CantataResult, TemplateError};
///
/// fn build() -> CantataResult<()> {
///     Err(TemplateError::from("no batches for this topic"))?
/// }
///
/// let err = build().unwrap_err();
/// assert!(matches!(err.kind(), CantataErrorKind::Template(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Cantata Error: {}", _0)]
pub struct CantataError(Box<CantataErrorKind>);

impl CantataError {
    /// Create a new error from a kind.
    pub fn new(kind: CantataErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CantataErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to CantataErrorKind
impl<T> From<T> for CantataError
where
    T: Into<CantataErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Cantata operations.
pub type CantataResult<T> = std::result::Result<T, CantataError>;
