//! Test utilities for end-to-end tests.
//!
//! In-memory backends that answer from a script and record their inputs.

#![allow(dead_code)]

use async_trait::async_trait;
use cantata::{BackendError, CantataResult, ChatBackend, ChunkBoxStream, Message, PromptBackend};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

fn stream_of(chunks: Vec<String>) -> ChunkBoxStream {
    let items: Vec<CantataResult<String>> = chunks.into_iter().map(Ok).collect();
    Box::pin(futures_util::stream::iter(items))
}

fn next_reply(replies: &Mutex<VecDeque<Vec<String>>>) -> CantataResult<ChunkBoxStream> {
    match replies.lock().unwrap().pop_front() {
        Some(chunks) => Ok(stream_of(chunks)),
        None => Err(BackendError::new("script exhausted").into()),
    }
}

fn script(replies: &[&[&str]]) -> Arc<Mutex<VecDeque<Vec<String>>>> {
    Arc::new(Mutex::new(
        replies
            .iter()
            .map(|chunks| chunks.iter().map(|c| c.to_string()).collect())
            .collect(),
    ))
}

/// Chat backend replaying chunked replies.
#[derive(Clone)]
pub struct ScriptedChat {
    replies: Arc<Mutex<VecDeque<Vec<String>>>>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedChat {
    pub fn new(replies: &[&[&str]]) -> Self {
        Self {
            replies: script(replies),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Message lists received, in call order.
    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedChat {
    async fn stream_chat(
        &self,
        messages: &[Message],
        _stop: Option<&str>,
    ) -> CantataResult<ChunkBoxStream> {
        self.seen.lock().unwrap().push(messages.to_vec());
        next_reply(&self.replies)
    }

    fn provider_name(&self) -> &str {
        "scripted-chat"
    }
}

/// Single-turn backend replaying chunked replies.
#[derive(Clone)]
pub struct ScriptedCompletion {
    replies: Arc<Mutex<VecDeque<Vec<String>>>>,
    seen: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl ScriptedCompletion {
    pub fn new(replies: &[&[&str]]) -> Self {
        Self {
            replies: script(replies),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts and stop sequences received, in call order.
    pub fn seen(&self) -> Vec<(String, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl PromptBackend for ScriptedCompletion {
    async fn stream_prompt(
        &self,
        prompt: &str,
        stop: Option<&str>,
    ) -> CantataResult<ChunkBoxStream> {
        self.seen
            .lock()
            .unwrap()
            .push((prompt.to_string(), stop.map(str::to_string)));
        next_reply(&self.replies)
    }

    fn provider_name(&self) -> &str {
        "scripted-completion"
    }
}

/// Log sink for asserting on formatted `tracing` output.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
