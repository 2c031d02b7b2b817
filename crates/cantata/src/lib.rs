//! Cantata - composable multi-turn prompt templates.
//!
//! Cantata describes a conversation with a language model as a template of
//! role-tagged batches, runs it against any completion backend, and hands
//! the result back either as a stream of fragments or as one aggregate of
//! transcript plus structured outputs.
//!
//! # Quick Start
//!
//! ```
//! use cantata::{Action, Batch, Completion, ConnectorStyle, Prompt, Template, connector_fn};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> cantata::CantataResult<()> {
//! let template = Template::from_fn(|bindings| {
//!     let city = bindings.param_str("city")?;
//!     Ok(vec![
//!         Batch::system([Action::text("Answer in one word.")]),
//!         Batch::user([Action::text(format!("Which country is {city} in?"))]),
//!         Batch::assistant([Action::generate("country")?]),
//!     ])
//! });
//!
//! let connector = connector_fn(ConnectorStyle::Chat, |_| async {
//!     Ok(Completion::resolved("France"))
//! });
//!
//! let aggregate = Prompt::new(template, connector)
//!     .run(json!({"city": "Lyon"}))
//!     .await?;
//! assert_eq!(aggregate.outputs().as_value(), &json!({"country": "France"}));
//! # Ok(())
//! # }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry tracing bridge with a stdout exporter
//!
//! # Architecture
//!
//! Cantata is organized as a workspace with focused crates:
//!
//! - `cantata_error` - Error types
//! - `cantata_core` - Paths, output map, fragments, transcript, run state, configuration
//! - `cantata_interface` - Completion connector traits
//! - `cantata_connectors` - Single-turn and chat adapters
//! - `cantata_orchestration` - Templates, the orchestrator and runs
//!
//! This crate (`cantata`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod logging;

#[cfg(feature = "observability")]
mod observability;

pub use cantata_connectors::*;
pub use cantata_core::*;
pub use cantata_error::*;
pub use cantata_interface::*;
pub use cantata_orchestration::*;

pub use logging::{DEFAULT_FILTER, init_logging, init_logging_with_filter};

#[cfg(feature = "observability")]
pub use observability::{
    ObservabilityConfig, init_observability, init_observability_with_config,
    shutdown_observability,
};
