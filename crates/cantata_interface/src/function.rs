//! Connectors built from plain async closures.

use crate::{Completion, CompletionConnector, CompletionRequest, ConnectorStyle};
use async_trait::async_trait;
use cantata_error::CantataResult;
use std::future::Future;

/// A connector backed by an async closure.
///
/// # Examples
///
/// ```
/// use cantata_interface::{Completion, ConnectorStyle, connector_fn};
///
/// let echo = connector_fn(ConnectorStyle::Chat, |request| async move {
///     Ok(Completion::resolved(request.transcript().text().to_uppercase()))
/// });
/// # let _ = echo;
/// ```
pub struct FnConnector<F> {
    complete: F,
    style: ConnectorStyle,
}

/// Wraps `complete` as a [`CompletionConnector`].
pub fn connector_fn<F, Fut>(style: ConnectorStyle, complete: F) -> FnConnector<F>
where
    F: Fn(CompletionRequest) -> Fut + Send + Sync,
    Fut: Future<Output = CantataResult<Completion>> + Send,
{
    FnConnector { complete, style }
}

#[async_trait]
impl<F, Fut> CompletionConnector for FnConnector<F>
where
    F: Fn(CompletionRequest) -> Fut + Send + Sync,
    Fut: Future<Output = CantataResult<Completion>> + Send,
{
    async fn complete(&self, request: CompletionRequest) -> CantataResult<Completion> {
        (self.complete)(request).await
    }

    fn style(&self) -> ConnectorStyle {
        self.style
    }
}
