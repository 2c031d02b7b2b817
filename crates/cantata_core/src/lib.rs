//! Core data types for the Cantata prompt orchestration library.
//!
//! This crate provides the values a run threads around: roles and messages,
//! output paths and the output map, fragments and the transcript, per-run
//! state, per-directive context, and configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod format;
mod fragment;
mod message;
mod output;
mod path;
mod role;
mod settings;
mod state;
mod transcript;

pub use context::Context;
pub use format::PromptFormat;
pub use fragment::{Fragment, FragmentKind};
pub use message::{Message, MessageBuilder};
pub use output::{OutputMap, json_type, lookup, value_text};
pub use path::{OutputPath, PathSegment};
pub use role::Role;
pub use settings::{CantataConfig, MissingSourcePolicy, OrchestratorSettings};
pub use state::{LoopId, RunState};
pub use transcript::Transcript;
