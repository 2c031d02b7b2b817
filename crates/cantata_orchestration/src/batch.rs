//! Message batches: one turn of the conversation.

use crate::Action;
use cantata_core::Role;

/// Ordered actions spoken by one role.
///
/// A batch runs as a role wrapper: it opens a message for its role, then
/// executes its actions inside it.
///
/// # Examples
///
/// ```
/// use cantata_core::Role;
/// use cantata_orchestration::{Action, Batch};
///
/// let batch = Batch::assistant([Action::generate("answer")?]);
/// assert_eq!(*batch.role(), Role::Assistant);
/// assert_eq!(batch.actions().len(), 1);
/// # Ok::<(), cantata_error::CantataError>(())
/// ```
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct Batch {
    /// Role every fragment of the batch belongs to
    role: Role,
    /// Actions in execution order
    actions: Vec<Action>,
}

impl Batch {
    /// Batch for `role`.
    pub fn new(role: Role, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            role,
            actions: actions.into_iter().collect(),
        }
    }

    /// System batch.
    pub fn system(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(Role::System, actions)
    }

    /// User batch.
    pub fn user(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(Role::User, actions)
    }

    /// Assistant batch.
    pub fn assistant(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(Role::Assistant, actions)
    }

    /// Appends an action.
    pub fn push(&mut self, action: impl Into<Action>) {
        self.actions.push(action.into());
    }

    /// The batch as a role wrapper.
    pub fn into_action(self) -> Action {
        Action::Role {
            role: self.role,
            actions: self.actions,
        }
    }
}
