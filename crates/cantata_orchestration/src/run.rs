//! One execution of a template, consumable step by step or all at once.

use crate::executor::{FragmentStream, RunShared};
use cantata_core::{Fragment, OutputMap, Transcript};
use cantata_error::{CantataResult, RunError, RunErrorKind};
use futures_util::future::poll_fn;
use futures_util::stream::{FusedStream, Stream};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Lifecycle of a run.
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
)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Created, not yet polled
    #[display("idle")]
    Idle,
    /// Steps are being produced
    #[display("running")]
    Running,
    /// Every batch has drained
    #[display("completed")]
    Completed,
    /// A step failed; nothing more will be produced
    #[display("failed")]
    Failed,
}

/// One incremental observation of a run.
///
/// The transcript and outputs are snapshots taken right after `fragment`
/// was appended.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct Step {
    /// The fragment just emitted
    fragment: Fragment,
    /// Transcript including `fragment`
    transcript: Transcript,
    /// Outputs as of `fragment`
    outputs: OutputMap,
}

impl Step {
    pub(crate) fn new(fragment: Fragment, transcript: Transcript, outputs: OutputMap) -> Self {
        Self {
            fragment,
            transcript,
            outputs,
        }
    }

    /// Split into owned parts.
    pub fn into_parts(self) -> (Fragment, Transcript, OutputMap) {
        (self.fragment, self.transcript, self.outputs)
    }
}

/// Final value of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RunAggregate {
    /// Every fragment the run emitted
    transcript: Transcript,
    /// Every output the run wrote
    outputs: OutputMap,
}

impl RunAggregate {
    /// Split into owned parts.
    pub fn into_parts(self) -> (Transcript, OutputMap) {
        (self.transcript, self.outputs)
    }
}

/// Cloneable handle for queueing input into a run from anywhere.
#[derive(Clone)]
pub struct RunInput {
    shared: Arc<RunShared>,
}

impl RunInput {
    /// Queues `value` for the next generation directive reading `name`.
    pub fn input(&self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.shared.state().enqueue(name, value);
    }

    /// Number of values still waiting under `name`.
    pub fn pending(&self, name: &str) -> usize {
        self.shared.state().queued(name)
    }
}

impl fmt::Debug for RunInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunInput").finish_non_exhaustive()
    }
}

/// A single execution of a template.
///
/// Drive it as a [`Stream`] of [`Step`]s, `.await` it for the
/// [`RunAggregate`], or both: awaiting after some steps drains only what is
/// left. Nothing runs until the run is polled, and dropping it abandons the
/// execution.
///
/// # Examples
///
/// ```
/// use cantata_interface::{Completion, ConnectorStyle, connector_fn};
/// use cantata_orchestration::{Action, Batch, Prompt, Template};
/// use futures_util::StreamExt;
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> cantata_error::CantataResult<()> {
/// let connector = connector_fn(ConnectorStyle::Chat, |_| async {
///     Ok(Completion::resolved("Hello!"))
/// });
/// let template = Template::from_batches([
///     Batch::user([Action::text("Greet me.")]),
///     Batch::assistant([Action::generate("greeting")?]),
/// ]);
/// let prompt = Prompt::new(template, connector);
///
/// let mut run = prompt.run(json!({}));
/// let first = run.next().await.unwrap()?;
/// assert!(first.fragment().is_role_marker());
///
/// let aggregate = run.await?;
/// assert_eq!(aggregate.outputs().as_value(), &json!({"greeting": "Hello!"}));
/// # Ok(())
/// # }
/// ```
pub struct Run {
    fragments: FragmentStream<'static>,
    shared: Arc<RunShared>,
    status: RunStatus,
}

impl Run {
    pub(crate) fn new(fragments: FragmentStream<'static>, shared: Arc<RunShared>) -> Self {
        Self {
            fragments,
            shared,
            status: RunStatus::Idle,
        }
    }

    /// Where the run is in its lifecycle.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Queues `value` for the next generation directive reading `name`.
    ///
    /// Only directives that start after this call can see the value.
    pub fn input(&self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.shared.state().enqueue(name, value);
    }

    /// Handle for queueing input while the run is being consumed elsewhere.
    pub fn input_handle(&self) -> RunInput {
        RunInput {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Snapshot of the transcript so far.
    pub fn transcript(&self) -> Transcript {
        self.shared.transcript()
    }

    /// Snapshot of the outputs so far.
    pub fn outputs(&self) -> OutputMap {
        self.shared.outputs()
    }

    /// Drains the remaining steps and returns the aggregate.
    ///
    /// Fragments drained here are not snapshotted.
    ///
    /// # Errors
    ///
    /// - The first error a remaining step produces
    /// - `RunErrorKind::AlreadyFailed` if the run failed before this call
    pub async fn aggregate(mut self) -> CantataResult<RunAggregate> {
        if self.status == RunStatus::Failed {
            return Err(RunError::new(RunErrorKind::AlreadyFailed).into());
        }
        while let Some(fragment) = poll_fn(|cx| self.poll_fragment(cx)).await {
            fragment?;
        }
        let (transcript, outputs) = self.shared.take();
        Ok(RunAggregate {
            transcript,
            outputs,
        })
    }

    /// Advances execution by one fragment, tracking the lifecycle.
    fn poll_fragment(&mut self, cx: &mut Context<'_>) -> Poll<Option<CantataResult<Fragment>>> {
        if self.is_terminated() {
            return Poll::Ready(None);
        }
        self.status = RunStatus::Running;

        match self.fragments.as_mut().poll_next(cx) {
            Poll::Ready(Some(Err(e))) => {
                tracing::debug!(error = %e, "Run failed");
                self.status = RunStatus::Failed;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.status = RunStatus::Completed;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl Stream for Run {
    type Item = CantataResult<Step>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.poll_fragment(cx) {
            // Execution is suspended right after the fragment was recorded.
            Poll::Ready(Some(Ok(fragment))) => {
                let (transcript, outputs) = this.shared.snapshot();
                Poll::Ready(Some(Ok(Step::new(fragment, transcript, outputs))))
            }
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl FusedStream for Run {
    fn is_terminated(&self) -> bool {
        matches!(self.status, RunStatus::Completed | RunStatus::Failed)
    }
}

impl IntoFuture for Run {
    type Output = CantataResult<RunAggregate>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.aggregate())
    }
}

impl fmt::Debug for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Run")
            .field("status", &self.status)
            .field("fragments", &self.shared.fragment_count())
            .finish_non_exhaustive()
    }
}
