//! Test utilities for connector tests.
//!
//! Mock backends that stream scripted chunks and record what they were sent.

use async_trait::async_trait;
use cantata_core::{Context, Fragment, Message, Role, Transcript};
use cantata_error::{BackendError, CantataResult};
use cantata_interface::{ChatBackend, ChunkBoxStream, PromptBackend};
use std::sync::{Arc, Mutex};

/// Behavior configuration for mock backends.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Stream these chunks
    Chunks(Vec<String>),
    /// Refuse the request with this message
    Reject(String),
    /// Stream these chunks, then fail mid-stream with this message
    FailAfter(Vec<String>, String),
}

fn chunk_stream(behavior: &MockBehavior) -> CantataResult<ChunkBoxStream> {
    match behavior.clone() {
        MockBehavior::Chunks(chunks) => {
            let items: Vec<CantataResult<String>> = chunks.into_iter().map(Ok).collect();
            Ok(Box::pin(futures_util::stream::iter(items)))
        }
        MockBehavior::Reject(message) => Err(BackendError::new(message).into()),
        MockBehavior::FailAfter(chunks, message) => {
            let stream = async_stream::stream! {
                for chunk in chunks {
                    yield Ok(chunk);
                }
                yield Err(BackendError::new(message).into());
            };
            Ok(Box::pin(stream))
        }
    }
}

/// Mock single-turn backend.
#[derive(Clone)]
pub struct MockPromptBackend {
    behavior: MockBehavior,
    prompts: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl MockPromptBackend {
    /// Create a backend that streams `chunks`.
    pub fn new_chunks<S: Into<String>>(chunks: impl IntoIterator<Item = S>) -> Self {
        Self::new_with_behavior(MockBehavior::Chunks(
            chunks.into_iter().map(Into::into).collect(),
        ))
    }

    /// Create a backend with custom behavior.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times stream_prompt() was called.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts and stop sequences received, in call order.
    pub fn prompts(&self) -> Vec<(String, Option<String>)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PromptBackend for MockPromptBackend {
    async fn stream_prompt(
        &self,
        prompt: &str,
        stop: Option<&str>,
    ) -> CantataResult<ChunkBoxStream> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), stop.map(str::to_string)));
        chunk_stream(&self.behavior)
    }

    fn provider_name(&self) -> &str {
        "mock-prompt"
    }
}

/// Mock chat backend.
#[derive(Clone)]
pub struct MockChatBackend {
    behavior: MockBehavior,
    calls: Arc<Mutex<Vec<(Vec<Message>, Option<String>)>>>,
}

impl MockChatBackend {
    /// Create a backend that streams `chunks`.
    pub fn new_chunks<S: Into<String>>(chunks: impl IntoIterator<Item = S>) -> Self {
        Self::new_with_behavior(MockBehavior::Chunks(
            chunks.into_iter().map(Into::into).collect(),
        ))
    }

    /// Create a backend with custom behavior.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times stream_chat() was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Messages and stop sequences received, in call order.
    pub fn calls(&self) -> Vec<(Vec<Message>, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn stream_chat(
        &self,
        messages: &[Message],
        stop: Option<&str>,
    ) -> CantataResult<ChunkBoxStream> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), stop.map(str::to_string)));
        chunk_stream(&self.behavior)
    }

    fn provider_name(&self) -> &str {
        "mock-chat"
    }
}

/// A system line, a user question, and an open assistant turn.
#[allow(dead_code)]
pub fn sample_transcript() -> Transcript {
    let root = Context::root();
    let system = root.with_role(Role::System);
    let user = root.with_role(Role::User);
    [
        Fragment::role_marker(&root, Role::System),
        Fragment::literal(&system, "You are terse."),
        Fragment::role_marker(&root, Role::User),
        Fragment::literal(&user, "Name a color."),
        Fragment::role_marker(&root, Role::Assistant),
    ]
    .into_iter()
    .collect()
}
