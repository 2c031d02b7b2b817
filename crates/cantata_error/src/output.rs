//! Output map addressing errors.

/// Ways an output path can be malformed or misapplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OutputErrorKind {
    /// Path text could not be parsed
    #[display("Invalid output path '{}': {}", path, reason)]
    InvalidPath {
        /// Offending path text
        path: String,
        /// What was wrong with it
        reason: String,
    },
    /// A mapping directive was bound to a value that is not an array
    #[display("Output '{}' must be an array to be mapped over, found {}", path, found)]
    NotAnArray {
        /// Bound path
        path: String,
        /// JSON type that was found instead
        found: String,
    },
    /// Nothing is stored at the path
    #[display("No output value at '{}'", _0)]
    MissingValue(String),
    /// Index write skipped past the end of an array
    #[display("Index {} is out of range for '{}' (length {})", index, path, len)]
    IndexOutOfRange {
        /// Array path
        path: String,
        /// Requested index
        index: usize,
        /// Current array length
        len: usize,
    },
    /// An intermediate value cannot hold the next path segment
    #[display("Output '{}' holds {} and cannot contain '{}'", path, found, segment)]
    NotAContainer {
        /// Path of the intermediate value
        path: String,
        /// JSON type that was found
        found: String,
        /// Segment that could not be applied
        segment: String,
    },
    /// Append segments (`[]`) only make sense for writes
    #[display("Cannot read through an append segment in '{}'", _0)]
    AppendNotReadable(String),
}

/// Output map error with location tracking.
///
/// # Examples
///
/// ```
/// use cantata_error::{OutputError, OutputErrorKind};
///
/// let err = OutputError::new(OutputErrorKind::NotAnArray {
///     path: "items".to_string(),
///     found: "string".to_string(),
/// });
/// assert!(format!("{}", err).contains("must be an array"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Output Error: {} at line {} in {}", kind, line, file)]
pub struct OutputError {
    /// The specific error condition
    pub kind: OutputErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl OutputError {
    /// Create a new OutputError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OutputErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &OutputErrorKind {
        &self.kind
    }
}
