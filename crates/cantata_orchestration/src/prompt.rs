//! The factory that starts runs.

use crate::executor::{RunEnv, RunShared, run_fragments};
use crate::{Run, Template};
use cantata_core::{CantataConfig, OrchestratorSettings};
use cantata_interface::{CompletionConnector, ConnectorStyle};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// A template paired with a connector.
///
/// Each call to [`run`](Self::run) starts an independent run with fresh
/// run state, outputs and transcript. Cloning is cheap and clones share the
/// connector.
#[derive(Clone)]
pub struct Prompt {
    template: Template,
    connector: Arc<dyn CompletionConnector>,
    settings: OrchestratorSettings,
}

impl Prompt {
    /// Pairs `template` with `connector` using default settings.
    pub fn new(
        template: impl Into<Template>,
        connector: impl CompletionConnector + 'static,
    ) -> Self {
        Self::from_shared(template, Arc::new(connector))
    }

    /// Pairs `template` with an already shared connector.
    pub fn from_shared(
        template: impl Into<Template>,
        connector: Arc<dyn CompletionConnector>,
    ) -> Self {
        Self {
            template: template.into(),
            connector,
            settings: OrchestratorSettings::default(),
        }
    }

    /// Replaces the orchestrator settings.
    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Takes orchestrator settings from loaded configuration.
    pub fn with_config(self, config: &CantataConfig) -> Self {
        self.with_settings(config.orchestrator().clone())
    }

    /// The template runs execute.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Settings every run uses.
    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Backend shape of the connector.
    pub fn style(&self) -> ConnectorStyle {
        self.connector.style()
    }

    /// Starts a run with `params`.
    ///
    /// Nothing executes until the returned [`Run`] is polled or awaited.
    #[instrument(skip(self, params), fields(style = %self.connector.style()))]
    pub fn run(&self, params: impl Into<JsonValue>) -> Run {
        let shared = Arc::new(RunShared::default());
        let env = RunEnv {
            connector: Arc::clone(&self.connector),
            shared: Arc::clone(&shared),
            params: params.into(),
            settings: self.settings.clone(),
        };
        tracing::debug!("Created run");
        Run::new(run_fragments(self.template.clone(), env), shared)
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("template", &self.template)
            .field("style", &self.connector.style())
            .field("settings", &self.settings)
            .finish()
    }
}
