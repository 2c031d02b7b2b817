//! Trait definitions for the Cantata prompt orchestration library.
//!
//! This crate defines the completion connector seam: the single function
//! shape the orchestrator calls for every generation step, the value it
//! returns, and the backend traits the standard adapters wrap.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod completion;
mod function;
mod traits;
mod types;

pub use completion::{ChunkBoxStream, ChunkStream, Completion};
pub use function::{FnConnector, connector_fn};
pub use traits::{ChatBackend, CompletionConnector, PromptBackend};
pub use types::{CompletionRequest, CompletionRequestBuilder, ConnectorStyle};
