//! Template execution engine for Cantata.
//!
//! A [`Template`] describes a conversation as ordered [`Batch`]es of
//! [`Action`]s. A [`Prompt`] pairs a template with a
//! [`CompletionConnector`](cantata_interface::CompletionConnector) and starts
//! independent [`Run`]s.
//!
//! # Execution model
//!
//! - Batches run strictly in order, each as a role wrapper
//! - Actions run depth-first; every fragment is appended to the transcript
//!   before it is surfaced
//! - Generation directives consume queued input first and only call the
//!   connector when nothing is waiting
//! - Mapping directives iterate an output array and remember their position
//!   for the rest of the run
//!
//! A run is consumed either as a stream of [`Step`]s or by awaiting the
//! [`RunAggregate`]; both observe the same single execution.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod batch;
mod executor;
mod prompt;
mod run;
mod template;

pub use action::{Action, GenDirective, MapBody, MapDirective};
pub use batch::Batch;
pub use prompt::Prompt;
pub use run::{Run, RunAggregate, RunInput, RunStatus, Step};
pub use template::{Bindings, Template, TemplateFn};
