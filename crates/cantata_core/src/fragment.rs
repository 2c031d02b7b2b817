//! Fragments: the unit of transcript growth.

use crate::{Context, OutputPath, Role};
use serde::{Deserialize, Serialize};

/// What produced a fragment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    /// Start of a new message for the fragment's role
    #[display("role_marker")]
    RoleMarker,
    /// Text written in the template
    #[display("literal")]
    Literal,
    /// A chunk (or whole completion) from the backend
    #[display("generated")]
    Generated,
    /// A value taken from the input queue instead of calling the backend
    #[display("queued")]
    Queued,
    /// An output write with no text of its own; empty text
    #[display("output_marker")]
    OutputMarker,
}

/// One incremental piece of the conversation.
///
/// # Examples
///
/// ```
/// use cantata_core::{Context, Fragment, FragmentKind, Role};
///
/// let ctx = Context::root().with_role(Role::User);
/// let fragment = Fragment::literal(&ctx, "Summarise this:");
///
/// assert_eq!(*fragment.kind(), FragmentKind::Literal);
/// assert_eq!(*fragment.role(), Some(Role::User));
/// assert_eq!(fragment.text(), "Summarise this:");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Fragment {
    /// What produced this fragment
    kind: FragmentKind,
    /// Role the fragment belongs to
    role: Option<Role>,
    /// Output path the fragment contributes to (root when none)
    address: OutputPath,
    /// Text payload; empty for role and output markers
    text: String,
}

impl Fragment {
    /// Marks the start of a message for `role`.
    pub fn role_marker(ctx: &Context, role: Role) -> Self {
        Self {
            kind: FragmentKind::RoleMarker,
            role: Some(role),
            address: ctx.address().clone(),
            text: String::new(),
        }
    }

    /// Template text.
    pub fn literal(ctx: &Context, text: impl Into<String>) -> Self {
        Self::with_kind(FragmentKind::Literal, ctx, text)
    }

    /// Backend output.
    pub fn generated(ctx: &Context, text: impl Into<String>) -> Self {
        Self::with_kind(FragmentKind::Generated, ctx, text)
    }

    /// Queued caller input.
    pub fn queued(ctx: &Context, text: impl Into<String>) -> Self {
        Self::with_kind(FragmentKind::Queued, ctx, text)
    }

    /// Marks a write to the output at `ctx`'s address that carries no text.
    pub fn output_marker(ctx: &Context) -> Self {
        Self::with_kind(FragmentKind::OutputMarker, ctx, String::new())
    }

    fn with_kind(kind: FragmentKind, ctx: &Context, text: impl Into<String>) -> Self {
        Self {
            kind,
            role: *ctx.role(),
            address: ctx.address().clone(),
            text: text.into(),
        }
    }

    /// Whether this fragment only marks a message boundary.
    pub fn is_role_marker(&self) -> bool {
        self.kind == FragmentKind::RoleMarker
    }
}
