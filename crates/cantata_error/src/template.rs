//! Template materialisation errors.

/// Failures raised while turning a template into message batches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TemplateErrorKind {
    /// The template function refused to build batches
    #[display("Template construction failed: {}", _0)]
    Construction(String),
    /// Caller parameters were missing or had the wrong shape
    #[display("Invalid template parameters: {}", _0)]
    InvalidParams(String),
}

/// Template error with location tracking.
///
/// # Examples
///
/// ```
/// use cantata_error::{TemplateError, TemplateErrorKind};
///
/// let err = TemplateError::new(TemplateErrorKind::InvalidParams("missing 'topic'".to_string()));
/// assert!(format!("{}", err).contains("topic"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {} at line {} in {}", kind, line, file)]
pub struct TemplateError {
    kind: TemplateErrorKind,
    line: u32,
    file: &'static str,
}

impl TemplateError {
    /// Create a new template error with caller location tracking.
    #[track_caller]
    pub fn new(kind: TemplateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TemplateErrorKind {
        &self.kind
    }
}

impl From<String> for TemplateError {
    #[track_caller]
    fn from(msg: String) -> Self {
        Self::new(TemplateErrorKind::Construction(msg))
    }
}

impl From<&str> for TemplateError {
    #[track_caller]
    fn from(msg: &str) -> Self {
        Self::new(TemplateErrorKind::Construction(msg.to_string()))
    }
}
