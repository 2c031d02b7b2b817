//! Adapter for backends that take role-tagged messages.

use crate::{ConnectorMetrics, classify_error};
use async_trait::async_trait;
use cantata_core::Message;
use cantata_error::CantataResult;
use cantata_interface::{
    ChatBackend, ChunkStream, Completion, CompletionConnector, CompletionRequest, ConnectorStyle,
};
use std::time::Instant;
use tracing::{debug, instrument};

/// Connector that sends the transcript as chat messages.
///
/// The message the model is about to fill usually exists only as an empty
/// role marker; a trailing empty message is dropped before the call.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct ChatConnector<B> {
    backend: B,
}

impl<B: ChatBackend> ChatConnector<B> {
    /// Wraps `backend`.
    pub fn new(backend: B) -> Self {
        debug!(provider = backend.provider_name(), "Creating chat connector");
        Self { backend }
    }

    /// Messages sent for `request`.
    pub fn messages(request: &CompletionRequest) -> Vec<Message> {
        let mut messages = request.transcript().messages();
        if messages.last().is_some_and(Message::is_empty) {
            messages.pop();
        }
        messages
    }
}

#[async_trait]
impl<B: ChatBackend> CompletionConnector for ChatConnector<B> {
    #[instrument(
        skip(self, request),
        fields(provider = self.backend.provider_name(), fragments = request.transcript().len())
    )]
    async fn complete(&self, request: CompletionRequest) -> CantataResult<Completion> {
        let messages = Self::messages(&request);
        let prompt_chars = messages.iter().map(|m| m.content.len()).sum();
        debug!(message_count = messages.len(), "Sending chat messages");

        let started = Instant::now();
        let metrics = ConnectorMetrics::get();
        let chunks = match self
            .backend
            .stream_chat(&messages, request.stop().as_deref())
            .await
        {
            Ok(chunks) => chunks,
            Err(e) => {
                debug!(error = %e, "Backend rejected chat messages");
                metrics.record_error(
                    self.backend.provider_name(),
                    ConnectorStyle::Chat,
                    classify_error(&e),
                );
                return Err(e);
            }
        };
        metrics.record_request(
            self.backend.provider_name(),
            ConnectorStyle::Chat,
            prompt_chars,
            started.elapsed().as_secs_f64(),
        );

        Ok(Completion::Streaming(ChunkStream::new(chunks)))
    }

    fn style(&self) -> ConnectorStyle {
        ConnectorStyle::Chat
    }
}
