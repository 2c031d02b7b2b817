//! Trait definitions for connectors and the backends they wrap.

use crate::{ChunkBoxStream, Completion, CompletionRequest, ConnectorStyle};
use async_trait::async_trait;
use cantata_core::Message;
use cantata_error::CantataResult;
use std::sync::Arc;

/// The one seam between the orchestrator and a language model.
///
/// Given the transcript so far and an optional stop sequence, return either
/// the finished text or a stream of chunks. The orchestrator never looks at
/// backend-specific request or response shapes.
#[async_trait]
pub trait CompletionConnector: Send + Sync {
    /// Produce the next completion.
    async fn complete(&self, request: CompletionRequest) -> CantataResult<Completion>;

    /// Which backend shape this connector talks to.
    fn style(&self) -> ConnectorStyle;
}

#[async_trait]
impl<C: CompletionConnector + ?Sized> CompletionConnector for Arc<C> {
    async fn complete(&self, request: CompletionRequest) -> CantataResult<Completion> {
        (**self).complete(request).await
    }

    fn style(&self) -> ConnectorStyle {
        (**self).style()
    }
}

/// A backend that takes one flattened prompt and streams tokens back.
#[async_trait]
pub trait PromptBackend: Send + Sync {
    /// Stream a completion for `prompt`, stopping at `stop` if given.
    async fn stream_prompt(&self, prompt: &str, stop: Option<&str>)
    -> CantataResult<ChunkBoxStream>;

    /// Provider name (e.g., "anthropic", "llama.cpp").
    fn provider_name(&self) -> &str;
}

/// A backend that takes ordered role-tagged messages and streams tokens back.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Stream the next assistant message for `messages`.
    async fn stream_chat(
        &self,
        messages: &[Message],
        stop: Option<&str>,
    ) -> CantataResult<ChunkBoxStream>;

    /// Provider name (e.g., "openai", "gemini").
    fn provider_name(&self) -> &str;
}
