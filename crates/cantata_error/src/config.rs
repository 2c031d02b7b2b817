//! Configuration error types.

/// Specific configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged
    #[display("Failed to read configuration from {}: {}", source_name, message)]
    Load {
        /// File name or description of the source
        source_name: String,
        /// Underlying error message
        message: String,
    },
    /// The merged configuration did not match the expected shape
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use cantata_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Parse("unknown policy 'skip'".to_string()));
/// assert!(format!("{}", err).contains("unknown policy"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The specific error condition
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
