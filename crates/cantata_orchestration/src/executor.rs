//! Depth-first execution of batches against a connector.
//!
//! A run is one lazily driven stream of fragments. Each fragment is appended
//! to the transcript before it is yielded, so consumers observe fragments in
//! exactly transcript order. Shared state is only ever locked for the
//! duration of a single read or write, never across an await.
//!
//! An output write that carries no text (seeding a mapped array, or a
//! streamed completion that produced no chunks) is surfaced as an output
//! marker, so the state seen after the last fragment is the final state.

use crate::{Action, Bindings, Template};
use async_stream::try_stream;
use cantata_core::{
    Context, Fragment, MissingSourcePolicy, OrchestratorSettings, OutputMap, OutputPath,
    RunState, Transcript, json_type, lookup, value_text,
};
use cantata_error::{CantataResult, OutputError, OutputErrorKind};
use cantata_interface::{Completion, CompletionConnector, CompletionRequest};
use futures_util::stream::{Stream, StreamExt};
use serde_json::Value as JsonValue;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Boxed stream of emitted fragments.
pub(crate) type FragmentStream<'a> =
    Pin<Box<dyn Stream<Item = CantataResult<Fragment>> + Send + 'a>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-run state shared between the fragment stream and the run's handles.
#[derive(Debug, Default)]
pub(crate) struct RunShared {
    transcript: Mutex<Transcript>,
    outputs: Mutex<OutputMap>,
    state: RunState,
    snapshots: AtomicUsize,
}

impl RunShared {
    pub(crate) fn state(&self) -> &RunState {
        &self.state
    }

    /// Appends `fragment` to the transcript and hands it back for yielding.
    fn record(&self, fragment: Fragment) -> Fragment {
        lock(&self.transcript).push(fragment.clone());
        tracing::debug!(
            kind = %fragment.kind(),
            address = %fragment.address(),
            len = fragment.text().len(),
            "Emitted fragment"
        );
        fragment
    }

    /// Owned copies of the transcript and outputs as they stand now.
    pub(crate) fn snapshot(&self) -> (Transcript, OutputMap) {
        self.snapshots.fetch_add(1, Ordering::Relaxed);
        (self.transcript(), self.outputs())
    }

    #[cfg(test)]
    pub(crate) fn snapshot_count(&self) -> usize {
        self.snapshots.load(Ordering::Relaxed)
    }

    pub(crate) fn transcript(&self) -> Transcript {
        lock(&self.transcript).clone()
    }

    pub(crate) fn outputs(&self) -> OutputMap {
        lock(&self.outputs).clone()
    }

    pub(crate) fn fragment_count(&self) -> usize {
        lock(&self.transcript).len()
    }

    /// Moves the transcript and outputs out, leaving both empty.
    pub(crate) fn take(&self) -> (Transcript, OutputMap) {
        (
            std::mem::take(&mut *lock(&self.transcript)),
            std::mem::take(&mut *lock(&self.outputs)),
        )
    }

    fn write(&self, path: &OutputPath, value: JsonValue) -> CantataResult<()> {
        lock(&self.outputs).set(path, value)
    }

    fn append_text(&self, path: &OutputPath, text: &str) -> CantataResult<()> {
        lock(&self.outputs).append_text(path, text)
    }

    fn resolve_appends(&self, path: &OutputPath) -> OutputPath {
        lock(&self.outputs).resolve_appends(path)
    }

    fn read_array(&self, path: &OutputPath) -> CantataResult<Option<Vec<JsonValue>>> {
        Ok(lock(&self.outputs).array(path)?.cloned())
    }

    fn ensure_array(&self, path: &OutputPath) -> CantataResult<()> {
        lock(&self.outputs).ensure_array(path)
    }
}

/// Everything a run needs while executing actions.
pub(crate) struct RunEnv {
    pub(crate) connector: Arc<dyn CompletionConnector>,
    pub(crate) shared: Arc<RunShared>,
    pub(crate) params: JsonValue,
    pub(crate) settings: OrchestratorSettings,
}

impl RunEnv {
    /// Elements a mapping directive iterates, read once on entry.
    ///
    /// The flag is set when the array had to be written into the outputs.
    fn map_source(&self, path: &OutputPath) -> CantataResult<(Vec<JsonValue>, bool)> {
        if let Some(items) = self.shared.read_array(path)? {
            return Ok((items, false));
        }

        let from_params = if *self.settings.params_fallback() {
            lookup(&self.params, path)?
        } else {
            None
        };
        if let Some(value) = from_params {
            let JsonValue::Array(items) = value else {
                return Err(OutputError::new(OutputErrorKind::NotAnArray {
                    path: path.to_string(),
                    found: json_type(value).to_string(),
                })
                .into());
            };
            tracing::debug!(path = %path, len = items.len(), "Seeding mapped array from params");
            self.shared.write(path, value.clone())?;
            return Ok((items.clone(), true));
        }

        match self.settings.missing_map_source() {
            MissingSourcePolicy::Empty => {
                tracing::debug!(path = %path, "Mapped array absent, starting empty");
                self.shared.ensure_array(path)?;
                Ok((Vec::new(), true))
            }
            MissingSourcePolicy::Error => {
                Err(OutputError::new(OutputErrorKind::MissingValue(path.to_string())).into())
            }
        }
    }
}

/// Fragments of a whole run: materialize the template, then every batch in order.
pub(crate) fn run_fragments(template: Template, env: RunEnv) -> FragmentStream<'static> {
    Box::pin(template_fragments(template, env))
}

fn template_fragments(
    template: Template,
    env: RunEnv,
) -> impl Stream<Item = CantataResult<Fragment>> + Send + 'static {
    try_stream! {
        let bindings = Bindings::new(env.params.clone(), env.connector.style());
        let batches = template.materialize(&bindings)?;
        tracing::info!(batch_count = batches.len(), style = %env.connector.style(), "Run started");

        for (index, batch) in batches.into_iter().enumerate() {
            tracing::debug!(batch = index, role = %batch.role(), "Starting batch");
            let action = batch.into_action();
            let mut fragments = execute(&action, &env, Context::root());
            while let Some(fragment) = fragments.next().await {
                yield fragment?;
            }
        }

        tracing::info!(fragments = env.shared.fragment_count(), "Run completed");
    }
}

/// Fragments produced by one action and its descendants.
fn execute<'a>(action: &'a Action, env: &'a RunEnv, ctx: Context) -> FragmentStream<'a> {
    Box::pin(action_fragments(action, env, ctx))
}

fn action_fragments<'a>(
    action: &'a Action,
    env: &'a RunEnv,
    ctx: Context,
) -> impl Stream<Item = CantataResult<Fragment>> + Send + 'a {
    try_stream! {
        match action {
            Action::Literal(text) => {
                yield env.shared.record(Fragment::literal(&ctx, text.as_str()));
            }
            Action::Role { role, actions } => {
                yield env.shared.record(Fragment::role_marker(&ctx, *role));
                let inner = ctx.with_role(*role);
                for child in actions {
                    let mut fragments = execute(child, env, inner.clone());
                    while let Some(fragment) = fragments.next().await {
                        yield fragment?;
                    }
                }
            }
            Action::Sequence(actions) => {
                for child in actions {
                    let mut fragments = execute(child, env, ctx.clone());
                    while let Some(fragment) = fragments.next().await {
                        yield fragment?;
                    }
                }
            }
            Action::Generate(directive) => {
                let path = env.shared.resolve_appends(directive.path());
                let gen_ctx = ctx.with_address(path.clone());
                let name = directive.queue_name();

                if let Some(value) = env.shared.state.dequeue(&name) {
                    tracing::debug!(input = %name, path = %path, "Using queued input");
                    let text = value_text(&value);
                    env.shared.write(&path, value)?;
                    yield env.shared.record(Fragment::queued(&gen_ctx, text));
                } else {
                    let request =
                        CompletionRequest::new(env.shared.transcript(), directive.stop().clone());
                    tracing::debug!(
                        path = %path,
                        stop = ?directive.stop(),
                        "Requesting completion"
                    );

                    match env.connector.complete(request).await? {
                        Completion::Resolved(text) => {
                            env.shared.write(&path, JsonValue::String(text.clone()))?;
                            yield env.shared.record(Fragment::generated(&gen_ctx, text));
                        }
                        Completion::Streaming(mut chunks) => {
                            // The leaf holds the running total after every chunk.
                            env.shared.write(&path, JsonValue::String(String::new()))?;
                            while let Some(chunk) = chunks.next().await {
                                let chunk = chunk?;
                                env.shared.append_text(&path, &chunk)?;
                                yield env.shared.record(Fragment::generated(&gen_ctx, chunk));
                            }
                            tracing::debug!(
                                path = %path,
                                chunks = chunks.chunk_count(),
                                len = chunks.total().len(),
                                "Completion resolved"
                            );
                            if chunks.chunk_count() == 0 {
                                yield env.shared.record(Fragment::output_marker(&gen_ctx));
                            }
                        }
                    }
                }
            }
            Action::Map(directive) => {
                let (items, seeded) = env.map_source(directive.path())?;
                if seeded {
                    let seed_ctx = ctx.with_address(directive.path().clone());
                    yield env.shared.record(Fragment::output_marker(&seed_ctx));
                }
                let id = directive.loop_id();
                let start = env.shared.state.loop_position(id);
                if start > 0 {
                    tracing::debug!(loop_id = %id, start, len = items.len(), "Resuming loop");
                }

                for (index, element) in items.iter().enumerate().skip(start) {
                    let body = directive.body(element, index);
                    let body_ctx = ctx.with_address(directive.path().index(index));
                    let mut fragments = execute(&body, env, body_ctx);
                    while let Some(fragment) = fragments.next().await {
                        yield fragment?;
                    }
                    env.shared.state.advance_loop(id, index + 1);
                }
            }
        }
    }
}
