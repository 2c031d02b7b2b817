//! Run lifecycle errors.

/// Misuse of a run's consumption surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RunErrorKind {
    /// The aggregate was requested after the run had already failed
    #[display("Run failed before completing; no aggregate is available")]
    AlreadyFailed,
}

/// Run error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Run Error: {} at line {} in {}", kind, line, file)]
pub struct RunError {
    /// The specific error condition
    pub kind: RunErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RunError {
    /// Create a new RunError at the current location.
    #[track_caller]
    pub fn new(kind: RunErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
