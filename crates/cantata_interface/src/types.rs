//! Core type definitions for the connector interface.

use cantata_core::Transcript;
use serde::{Deserialize, Serialize};

/// Shape of backend a connector talks to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorStyle {
    /// One flattened prompt in, one completion out
    #[display("single_turn")]
    SingleTurn,
    /// Ordered role-tagged messages in, one completion out
    #[display("chat")]
    Chat,
}

/// What the orchestrator hands a connector for one generation step.
///
/// # Examples
///
/// ```
/// use cantata_core::Transcript;
/// use cantata_interface::CompletionRequestBuilder;
///
/// let request = CompletionRequestBuilder::default()
///     .transcript(Transcript::new())
///     .stop(Some("\n".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.stop().as_deref(), Some("\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CompletionRequest {
    /// Everything emitted so far, in order
    transcript: Transcript,
    /// Stop sequence requested by the generation directive
    #[builder(default)]
    stop: Option<String>,
}

impl CompletionRequest {
    /// Create a request from a transcript snapshot and an optional stop sequence.
    pub fn new(transcript: Transcript, stop: Option<String>) -> Self {
        Self { transcript, stop }
    }

    /// Split into owned parts.
    pub fn into_parts(self) -> (Transcript, Option<String>) {
        (self.transcript, self.stop)
    }
}
