//! Adapter for backends that take one flattened prompt.

use crate::{ConnectorMetrics, classify_error};
use async_trait::async_trait;
use cantata_core::PromptFormat;
use cantata_error::CantataResult;
use cantata_interface::{
    ChunkStream, Completion, CompletionConnector, CompletionRequest, ConnectorStyle, PromptBackend,
};
use std::time::Instant;
use tracing::{debug, instrument};

/// Connector that renders the transcript into a single prompt string.
///
/// Role markers become the format's role prefixes. A stop sequence on the
/// request overrides the format's default stop.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct SingleTurnConnector<B> {
    backend: B,
    format: PromptFormat,
}

impl<B: PromptBackend> SingleTurnConnector<B> {
    /// Wraps `backend`, flattening transcripts with `format`.
    pub fn new(backend: B, format: PromptFormat) -> Self {
        debug!(provider = backend.provider_name(), "Creating single-turn connector");
        Self { backend, format }
    }

    /// Renders the prompt and picks the stop sequence for `request`.
    pub fn prepare(&self, request: &CompletionRequest) -> (String, Option<String>) {
        let prompt = request.transcript().render(&self.format);
        let stop = request
            .stop()
            .clone()
            .or_else(|| self.format.default_stop().clone());
        (prompt, stop)
    }
}

#[async_trait]
impl<B: PromptBackend> CompletionConnector for SingleTurnConnector<B> {
    #[instrument(
        skip(self, request),
        fields(provider = self.backend.provider_name(), fragments = request.transcript().len())
    )]
    async fn complete(&self, request: CompletionRequest) -> CantataResult<Completion> {
        let (prompt, stop) = self.prepare(&request);
        debug!(prompt_len = prompt.len(), stop = ?stop, "Sending single-turn prompt");

        let started = Instant::now();
        let metrics = ConnectorMetrics::get();
        let chunks = match self.backend.stream_prompt(&prompt, stop.as_deref()).await {
            Ok(chunks) => chunks,
            Err(e) => {
                debug!(error = %e, "Backend rejected single-turn prompt");
                metrics.record_error(
                    self.backend.provider_name(),
                    ConnectorStyle::SingleTurn,
                    classify_error(&e),
                );
                return Err(e);
            }
        };
        metrics.record_request(
            self.backend.provider_name(),
            ConnectorStyle::SingleTurn,
            prompt.len(),
            started.elapsed().as_secs_f64(),
        );

        Ok(Completion::Streaming(ChunkStream::new(chunks)))
    }

    fn style(&self) -> ConnectorStyle {
        ConnectorStyle::SingleTurn
    }
}
