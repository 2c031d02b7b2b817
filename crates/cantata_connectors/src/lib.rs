//! Connector adapters for Cantata.
//!
//! The orchestrator talks to every language model through one
//! [`CompletionConnector`](cantata_interface::CompletionConnector). This crate
//! adapts the two common backend shapes to it:
//!
//! - [`SingleTurnConnector`] flattens the transcript into one prompt string
//!   using a [`PromptFormat`](cantata_core::PromptFormat) and calls a
//!   [`PromptBackend`](cantata_interface::PromptBackend).
//! - [`ChatConnector`] groups the transcript into role-tagged messages and
//!   calls a [`ChatBackend`](cantata_interface::ChatBackend).
//!
//! Both return the backend's chunk stream untouched, wrapped in a
//! [`ChunkStream`](cantata_interface::ChunkStream) that accumulates the
//! final text.
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use cantata_connectors::SingleTurnConnector;
//! use cantata_core::PromptFormat;
//! use cantata_error::CantataResult;
//! use cantata_interface::{ChunkBoxStream, PromptBackend};
//!
//! struct MyBackend;
//!
//! #[async_trait]
//! impl PromptBackend for MyBackend {
//!     async fn stream_prompt(
//!         &self,
//!         prompt: &str,
//!         _stop: Option<&str>,
//!     ) -> CantataResult<ChunkBoxStream> {
//!         let echo = prompt.to_string();
//!         Ok(Box::pin(futures_util::stream::once(async move { Ok(echo) })))
//!     }
//!
//!     fn provider_name(&self) -> &str {
//!         "echo"
//!     }
//! }
//!
//! let connector = SingleTurnConnector::new(MyBackend, PromptFormat::default());
//! # let _ = connector;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chat;
mod metrics;
mod single_turn;

pub use chat::ChatConnector;
pub use metrics::{ConnectorMetrics, classify_error};
pub use single_turn::SingleTurnConnector;
