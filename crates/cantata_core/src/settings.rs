//! Configuration for prompt flattening and orchestration policy.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from cantata.toml)
//! - User overrides (./cantata.toml or ~/.config/cantata/cantata.toml)
//! - Automatic merging with user values taking precedence

use crate::PromptFormat;
use cantata_error::{CantataError, CantataResult, ConfigError, ConfigErrorKind};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// What a mapping directive does when its array is nowhere to be found.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum MissingSourcePolicy {
    /// Initialise the path to `[]` and iterate zero times
    #[default]
    #[display("empty")]
    Empty,
    /// Fail the run with `OutputErrorKind::MissingValue`
    #[display("error")]
    Error,
}

/// Knobs for the orchestrator.
///
/// # Example
///
/// ```toml
/// [orchestrator]
/// missing_map_source = "error"
/// params_fallback = false
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct OrchestratorSettings {
    /// Policy for mapping directives whose array is absent
    #[serde(default)]
    missing_map_source: MissingSourcePolicy,
    /// Look a missing array up in the caller parameters first
    #[serde(default = "default_params_fallback")]
    params_fallback: bool,
}

fn default_params_fallback() -> bool {
    true
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            missing_map_source: MissingSourcePolicy::default(),
            params_fallback: default_params_fallback(),
        }
    }
}

/// Top-level Cantata configuration.
///
/// Loads with a precedence system:
/// 1. Bundled defaults (include_str! from cantata.toml)
/// 2. User override (~/.config/cantata/cantata.toml, then ./cantata.toml)
///
/// # Example
///
/// ```no_run
/// use cantata_core::CantataConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CantataConfig::load()?;
/// println!("assistant prefix: {:?}", config.prompt_format().assistant_prefix());
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct CantataConfig {
    /// Single-turn prompt flattening
    #[serde(default)]
    prompt_format: PromptFormat,
    /// Orchestrator policy
    #[serde(default)]
    orchestrator: OrchestratorSettings,
}

impl CantataConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> CantataResult<Self> {
        debug!("Loading configuration from file");

        let source_name = path.as_ref().display().to_string();
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| load_error(&source_name, e))?
            .try_deserialize()
            .map_err(parse_error)
    }

    /// Load configuration with precedence: current dir > home dir > bundled default.
    ///
    /// User config files are optional and silently skipped if absent.
    #[instrument]
    pub fn load() -> CantataResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../cantata.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/cantata/cantata.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("cantata").required(false));

        builder
            .build()
            .map_err(|e| load_error("merged sources", e))?
            .try_deserialize()
            .map_err(parse_error)
    }

    /// Parse configuration from TOML text, on top of nothing but serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has the wrong shape.
    pub fn from_toml_str(text: &str) -> CantataResult<Self> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .map_err(|e| load_error("inline TOML", e))?
            .try_deserialize()
            .map_err(parse_error)
    }
}

fn load_error(source_name: &str, e: config::ConfigError) -> CantataError {
    ConfigError::new(ConfigErrorKind::Load {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
    .into()
}

fn parse_error(e: config::ConfigError) -> CantataError {
    let mut message = e.to_string();
    if message.contains("unknown variant") {
        let accepted: Vec<String> = MissingSourcePolicy::iter().map(|p| p.to_string()).collect();
        message.push_str(&format!(" (missing_map_source accepts: {})", accepted.join(", ")));
    }
    ConfigError::new(ConfigErrorKind::Parse(message)).into()
}
