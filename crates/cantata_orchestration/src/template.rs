//! Templates and the bindings a template function receives.

use crate::{Action, Batch, GenDirective, MapDirective};
use cantata_core::{OutputPath, lookup};
use cantata_error::{CantataResult, TemplateError, TemplateErrorKind};
use cantata_interface::ConnectorStyle;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Function that builds batches from bindings.
pub type TemplateFn = Arc<dyn Fn(&Bindings) -> CantataResult<Vec<Batch>> + Send + Sync>;

/// What a run executes.
///
/// A static template is a fixed list of batches. A dynamic template is
/// called once per run, before any batch executes, with that run's
/// [`Bindings`].
///
/// # Examples
///
/// ```
/// use cantata_orchestration::{Action, Batch, Template};
///
/// let template = Template::from_fn(|bindings| {
///     let topic = bindings.param_str("topic")?;
///     Ok(vec![
///         Batch::user([Action::text(format!("Write a haiku about {topic}."))]),
///         Batch::assistant([Action::from(bindings.generate("haiku")?)]),
///     ])
/// });
/// # let _ = template;
/// ```
#[derive(Clone)]
pub enum Template {
    /// Fixed batches
    Static(Vec<Batch>),
    /// Batches built per run
    Dynamic(TemplateFn),
}

impl Template {
    /// Template over fixed batches.
    pub fn from_batches(batches: impl IntoIterator<Item = Batch>) -> Self {
        Self::Static(batches.into_iter().collect())
    }

    /// Template built by `build` at the start of every run.
    pub fn from_fn<F>(build: F) -> Self
    where
        F: Fn(&Bindings) -> CantataResult<Vec<Batch>> + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(build))
    }

    /// The batches for one run.
    ///
    /// # Errors
    ///
    /// Whatever the template function returns.
    pub fn materialize(&self, bindings: &Bindings) -> CantataResult<Vec<Batch>> {
        match self {
            Self::Static(batches) => Ok(batches.clone()),
            Self::Dynamic(build) => {
                let batches = build(bindings)?;
                debug!(batch_count = batches.len(), "Materialized template");
                Ok(batches)
            }
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(batches) => f.debug_tuple("Static").field(batches).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<Vec<Batch>> for Template {
    fn from(batches: Vec<Batch>) -> Self {
        Self::Static(batches)
    }
}

/// Inputs a template function builds from.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct Bindings {
    /// Caller parameters for this run
    params: JsonValue,
    /// Backend shape of the run's connector
    style: ConnectorStyle,
}

impl Bindings {
    /// Bindings for one run.
    pub fn new(params: JsonValue, style: ConnectorStyle) -> Self {
        Self { params, style }
    }

    /// Generation directive bound to `path`.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not parse or is the root.
    #[track_caller]
    pub fn generate(&self, path: &str) -> CantataResult<GenDirective> {
        GenDirective::new(path)
    }

    /// Mapping directive over the array at `path`.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not parse, is the root, or contains `[]`.
    #[track_caller]
    pub fn map<F>(&self, path: &str, body: F) -> CantataResult<MapDirective>
    where
        F: Fn(&JsonValue, usize) -> Action + Send + Sync + 'static,
    {
        MapDirective::new(path, body)
    }

    /// Caller parameter at `path`, if present.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not parse or contains `[]`.
    pub fn param(&self, path: &str) -> CantataResult<Option<&JsonValue>> {
        lookup(&self.params, &OutputPath::parse(path)?)
    }

    /// Caller parameter at `path` as a string.
    ///
    /// # Errors
    ///
    /// `TemplateErrorKind::InvalidParams` when the parameter is missing or not
    /// a string.
    #[track_caller]
    pub fn param_str(&self, path: &str) -> CantataResult<&str> {
        match self.param(path)? {
            Some(JsonValue::String(text)) => Ok(text),
            Some(_) => Err(TemplateError::new(TemplateErrorKind::InvalidParams(format!(
                "'{}' must be a string",
                path
            )))
            .into()),
            None => Err(TemplateError::new(TemplateErrorKind::InvalidParams(format!(
                "'{}' is required",
                path
            )))
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cantata_error::CantataErrorKind;
    use serde_json::json;

    #[test]
    fn test_static_template_materializes_clones() {
        let template = Template::from_batches([Batch::user([Action::text("hi")])]);
        let bindings = Bindings::new(json!({}), ConnectorStyle::Chat);
        assert_eq!(template.materialize(&bindings).unwrap().len(), 1);
        assert_eq!(template.materialize(&bindings).unwrap().len(), 1);
    }

    #[test]
    fn test_dynamic_template_sees_params_and_style() {
        let template = Template::from_fn(|bindings| {
            let mut batch = Batch::user([Action::text(bindings.param_str("name")?)]);
            if *bindings.style() == ConnectorStyle::SingleTurn {
                batch.push("\n");
            }
            Ok(vec![batch])
        });

        let bindings = Bindings::new(json!({"name": "Ada"}), ConnectorStyle::SingleTurn);
        let batches = template.materialize(&bindings).unwrap();
        assert_eq!(batches[0].actions().len(), 2);
    }

    #[test]
    fn test_missing_param_is_invalid_params() {
        let bindings = Bindings::new(json!({"name": 3}), ConnectorStyle::Chat);

        let err = bindings.param_str("topic").unwrap_err();
        assert!(matches!(
            err.kind(),
            CantataErrorKind::Template(e) if matches!(e.kind(), TemplateErrorKind::InvalidParams(_))
        ));
        assert!(bindings.param_str("name").is_err());
    }
}
