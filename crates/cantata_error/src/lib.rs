//! Error types for the Cantata library.
//!
//! This crate provides the foundation error types used throughout the Cantata workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use cantata_error::{BackendError, CantataResult};
//!
//! fn complete() -> CantataResult<String> {
//!     Err(BackendError::new("quota exceeded"))?
//! }
//!
//! match complete() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod config;
mod error;
mod output;
mod run;
mod template;

pub use backend::BackendError;
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{CantataError, CantataErrorKind, CantataResult};
pub use output::{OutputError, OutputErrorKind};
pub use run::{RunError, RunErrorKind};
pub use template::{TemplateError, TemplateErrorKind};
