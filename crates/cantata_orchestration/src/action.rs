//! The action tree a batch is made of.

use cantata_core::{LoopId, OutputPath, Role};
use cantata_error::{CantataResult, OutputError, OutputErrorKind};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Builds the body of a mapping directive for one array element.
///
/// Receives the element and its index.
pub type MapBody = Arc<dyn Fn(&JsonValue, usize) -> Action + Send + Sync>;

/// One node of a template.
///
/// # Examples
///
/// ```
/// use cantata_orchestration::Action;
///
/// let turn = Action::user([
///     Action::text("Summarise: "),
///     Action::text("the meeting notes"),
/// ]);
/// assert!(matches!(turn, Action::Role { .. }));
/// ```
#[derive(Debug, Clone)]
pub enum Action {
    /// Text copied into the transcript as-is
    Literal(String),
    /// Starts a message for `role` and runs `actions` inside it
    Role {
        /// Role the nested fragments belong to
        role: Role,
        /// Children, in order
        actions: Vec<Action>,
    },
    /// Asks the backend (or the input queue) for text
    Generate(GenDirective),
    /// Repeats a body once per element of an output array
    Map(MapDirective),
    /// Runs children in order
    Sequence(Vec<Action>),
}

impl Action {
    /// Literal text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Role wrapper over `actions`.
    pub fn role(role: Role, actions: impl IntoIterator<Item = Action>) -> Self {
        Self::Role {
            role,
            actions: actions.into_iter().collect(),
        }
    }

    /// System role wrapper.
    pub fn system(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::role(Role::System, actions)
    }

    /// User role wrapper.
    pub fn user(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::role(Role::User, actions)
    }

    /// Assistant role wrapper.
    pub fn assistant(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::role(Role::Assistant, actions)
    }

    /// Generation directive bound to `path`.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not parse or is the root.
    pub fn generate(path: &str) -> CantataResult<Self> {
        Ok(Self::Generate(GenDirective::new(path)?))
    }

    /// Mapping directive over the array at `path`.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not parse, is the root, or contains `[]`.
    pub fn map<F>(path: &str, body: F) -> CantataResult<Self>
    where
        F: Fn(&JsonValue, usize) -> Action + Send + Sync + 'static,
    {
        Ok(Self::Map(MapDirective::new(path, body)?))
    }

    /// Children run in order.
    pub fn sequence(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::Sequence(actions.into_iter().collect())
    }
}

impl From<&str> for Action {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Action {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<GenDirective> for Action {
    fn from(directive: GenDirective) -> Self {
        Self::Generate(directive)
    }
}

impl From<MapDirective> for Action {
    fn from(directive: MapDirective) -> Self {
        Self::Map(directive)
    }
}

/// Requests text for one output path.
///
/// The queued input named [`queue_name`](Self::queue_name) is consumed first;
/// the backend is only called when nothing is waiting.
///
/// # Examples
///
/// ```
/// use cantata_orchestration::GenDirective;
///
/// let directive = GenDirective::new("reply")?.with_stop("\n");
/// assert_eq!(directive.queue_name(), "reply");
/// assert_eq!(directive.stop().as_deref(), Some("\n"));
/// # Ok::<(), cantata_error::CantataError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GenDirective {
    /// Where the completed text is written
    path: OutputPath,
    /// Queue name consulted before calling the backend
    input_name: Option<String>,
    /// Stop sequence passed to the connector
    stop: Option<String>,
}

impl GenDirective {
    /// Directive bound to `path`.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not parse or is the root.
    #[track_caller]
    pub fn new(path: &str) -> CantataResult<Self> {
        let path = OutputPath::parse(path)?;
        if path.is_root() {
            return Err(OutputError::new(OutputErrorKind::InvalidPath {
                path: String::new(),
                reason: "generated text needs a named output".to_string(),
            })
            .into());
        }
        Ok(Self {
            path,
            input_name: None,
            stop: None,
        })
    }

    /// Stop generation at `stop`.
    pub fn with_stop(mut self, stop: impl Into<String>) -> Self {
        self.stop = Some(stop.into());
        self
    }

    /// Consume queued input under `name` instead of the path text.
    pub fn with_input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    /// Name of the queue this directive reads.
    pub fn queue_name(&self) -> String {
        self.input_name
            .clone()
            .unwrap_or_else(|| self.path.to_string())
    }
}

/// Iterates over an output array, running a body per element.
///
/// Progress is kept in run state under [`loop_id`](Self::loop_id), so a
/// directive that appears again later in the run resumes after the elements
/// it has already handled.
#[derive(Clone, derive_getters::Getters)]
pub struct MapDirective {
    /// Array the directive iterates
    path: OutputPath,
    /// Identity of the loop counter
    loop_id: LoopId,
    /// Builds the body for each element
    #[getter(skip)]
    body: MapBody,
}

impl MapDirective {
    /// Directive over the array at `path`.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not parse, is the root, or contains `[]`.
    #[track_caller]
    pub fn new<F>(path: &str, body: F) -> CantataResult<Self>
    where
        F: Fn(&JsonValue, usize) -> Action + Send + Sync + 'static,
    {
        let parsed = OutputPath::parse(path)?;
        let reason = if parsed.is_root() {
            Some("the output root is an object, not an array")
        } else if parsed.has_append() {
            Some("a mapped array must be addressed without '[]'")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(OutputError::new(OutputErrorKind::InvalidPath {
                path: path.to_string(),
                reason: reason.to_string(),
            })
            .into());
        }
        Ok(Self {
            loop_id: LoopId::from(&parsed),
            path: parsed,
            body: Arc::new(body),
        })
    }

    /// Track progress under an explicit identity.
    pub fn with_loop_id(mut self, id: impl Into<LoopId>) -> Self {
        self.loop_id = id.into();
        self
    }

    /// Builds the body for the element at `index`.
    pub fn body(&self, element: &JsonValue, index: usize) -> Action {
        (self.body)(element, index)
    }
}

impl fmt::Debug for MapDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapDirective")
            .field("path", &self.path)
            .field("loop_id", &self.loop_id)
            .finish_non_exhaustive()
    }
}
