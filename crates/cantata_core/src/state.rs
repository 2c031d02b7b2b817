//! Mutable state threaded through one run.
//!
//! Holds loop counters for mapping directives and the per-name queue of
//! caller-supplied inputs. Everything sits behind interior locks so a caller
//! can enqueue from another task while the run is being driven.

use crate::OutputPath;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Identity of a mapping directive's loop counter.
///
/// Defaults to the text of the directive's bound path, so the same directive
/// placed in several batches resumes instead of restarting.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
pub struct LoopId(String);

impl LoopId {
    /// Loop identity from an explicit name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identity as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LoopId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<&OutputPath> for LoopId {
    fn from(path: &OutputPath) -> Self {
        Self(path.to_string())
    }
}

/// Per-run loop counters and queued inputs.
///
/// # Examples
///
/// ```
/// use cantata_core::RunState;
/// use serde_json::json;
///
/// let state = RunState::new();
/// state.enqueue("answer", json!("first"));
/// state.enqueue("answer", json!("second"));
///
/// assert_eq!(state.dequeue("answer"), Some(json!("first")));
/// assert_eq!(state.dequeue("answer"), Some(json!("second")));
/// assert_eq!(state.dequeue("answer"), None);
/// ```
#[derive(Debug, Default)]
pub struct RunState {
    loops: Mutex<HashMap<LoopId, usize>>,
    queue: Mutex<HashMap<String, VecDeque<JsonValue>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RunState {
    /// Creates empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a value for the next generation directive reading `name`.
    ///
    /// Never blocks beyond the internal lock; FIFO per name.
    pub fn enqueue(&self, name: impl Into<String>, value: impl Into<JsonValue>) {
        let name = name.into();
        let mut queue = lock(&self.queue);
        let pending = queue.entry(name.clone()).or_default();
        pending.push_back(value.into());
        debug!(name = %name, pending = pending.len(), "Queued input");
    }

    /// Takes the oldest value queued under `name`, if any.
    pub fn dequeue(&self, name: &str) -> Option<JsonValue> {
        let mut queue = lock(&self.queue);
        let pending = queue.get_mut(name)?;
        let value = pending.pop_front();
        if pending.is_empty() {
            queue.remove(name);
        }
        value
    }

    /// Number of values waiting under `name`.
    pub fn queued(&self, name: &str) -> usize {
        lock(&self.queue).get(name).map_or(0, VecDeque::len)
    }

    /// How many elements the loop has already processed.
    pub fn loop_position(&self, id: &LoopId) -> usize {
        lock(&self.loops).get(id).copied().unwrap_or(0)
    }

    /// Records that the loop has processed `position` elements.
    pub fn advance_loop(&self, id: &LoopId, position: usize) {
        lock(&self.loops).insert(id.clone(), position);
    }

    /// Number of loops that have recorded progress.
    pub fn loop_count(&self) -> usize {
        lock(&self.loops).len()
    }
}
