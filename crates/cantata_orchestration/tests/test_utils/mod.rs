//! Test utilities for orchestration tests.
//!
//! A scripted connector that replays canned replies and records every
//! request it receives.

#![allow(dead_code)]

use async_trait::async_trait;
use cantata_core::{Fragment, FragmentKind};
use cantata_error::{BackendError, CantataResult};
use cantata_interface::{Completion, CompletionConnector, CompletionRequest, ConnectorStyle};
use cantata_orchestration::{Run, Step};
use futures_util::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One canned connector reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Resolve immediately with this text
    Text(String),
    /// Stream these chunks
    Chunks(Vec<String>),
    /// Stream these chunks, then fail
    FailAfter(Vec<String>, String),
    /// Refuse the request
    Fail(String),
}

impl Reply {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    pub fn chunks(chunks: &[&str]) -> Self {
        Self::Chunks(chunks.iter().map(|c| c.to_string()).collect())
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Reply>,
    requests: Vec<CompletionRequest>,
}

/// Connector that replays replies in order.
///
/// Once the script runs out every call resolves to `"<default>"`.
#[derive(Clone)]
pub struct ScriptedConnector {
    script: Arc<Mutex<Script>>,
    style: ConnectorStyle,
}

impl ScriptedConnector {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                replies: replies.into_iter().collect(),
                requests: Vec::new(),
            })),
            style: ConnectorStyle::Chat,
        }
    }

    pub fn with_style(mut self, style: ConnectorStyle) -> Self {
        self.style = style;
        self
    }

    /// Get the number of times complete() was called.
    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().requests.len()
    }

    /// Requests received, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.script.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl CompletionConnector for ScriptedConnector {
    async fn complete(&self, request: CompletionRequest) -> CantataResult<Completion> {
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.requests.push(request);
            script.replies.pop_front()
        };
        match reply.unwrap_or_else(|| Reply::text("<default>")) {
            Reply::Text(text) => Ok(Completion::resolved(text)),
            Reply::Chunks(chunks) => {
                let items: Vec<CantataResult<String>> = chunks.into_iter().map(Ok).collect();
                Ok(Completion::streaming(futures_util::stream::iter(items)))
            }
            Reply::FailAfter(chunks, message) => {
                let mut items: Vec<CantataResult<String>> = chunks.into_iter().map(Ok).collect();
                items.push(Err(BackendError::new(message).into()));
                Ok(Completion::streaming(futures_util::stream::iter(items)))
            }
            Reply::Fail(message) => Err(BackendError::new(message).into()),
        }
    }

    fn style(&self) -> ConnectorStyle {
        self.style
    }
}

/// Drives `run` to the end, returning every step.
pub async fn collect_steps(run: &mut Run) -> CantataResult<Vec<Step>> {
    let mut steps = Vec::new();
    while let Some(step) = run.next().await {
        steps.push(step?);
    }
    Ok(steps)
}

/// Compact `kind:text` rendering of fragments for order assertions.
pub fn describe(fragments: &[Fragment]) -> Vec<String> {
    fragments
        .iter()
        .map(|f| match f.kind() {
            FragmentKind::RoleMarker => {
                let role = f.role().map_or("none".to_string(), |r| r.to_string());
                format!("<{role}>")
            }
            FragmentKind::OutputMarker => format!("[{}]", f.address()),
            kind => format!("{}:{}", kind, f.text()),
        })
        .collect()
}
