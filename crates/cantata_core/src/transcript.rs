//! Append-only conversation log.

use crate::{Fragment, FragmentKind, Message, PromptFormat, Role};
use serde::{Deserialize, Serialize};

/// Ordered record of every fragment a run has emitted.
///
/// Only ever extended. Chat and single-turn connectors rebuild their request
/// from it on each generation step.
///
/// # Examples
///
/// ```
/// use cantata_core::{Context, Fragment, Message, Role, Transcript};
///
/// let user = Context::root().with_role(Role::User);
/// let mut transcript = Transcript::new();
/// transcript.push(Fragment::role_marker(&Context::root(), Role::User));
/// transcript.push(Fragment::literal(&user, "Hi"));
///
/// assert_eq!(transcript.messages(), vec![Message::new(Role::User, "Hi")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    fragments: Vec<Fragment>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment.
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// All fragments in emission order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Iterates fragments in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    /// Concatenated text of every fragment, ignoring roles.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text().as_str()).collect()
    }

    /// Text contributed by generation (backend or queued input).
    pub fn generated_text(&self) -> String {
        self.fragments
            .iter()
            .filter(|f| matches!(f.kind(), FragmentKind::Generated | FragmentKind::Queued))
            .map(|f| f.text().as_str())
            .collect()
    }

    /// Groups fragments into chat messages.
    ///
    /// A role marker always opens a new message; a change of role opens one
    /// too. Fragments without a role are attributed to `System`. Output
    /// markers contribute nothing.
    pub fn messages(&self) -> Vec<Message> {
        let mut messages: Vec<Message> = Vec::new();
        for fragment in &self.fragments {
            if *fragment.kind() == FragmentKind::OutputMarker {
                continue;
            }
            let role = fragment.role().unwrap_or(Role::System);
            if fragment.is_role_marker() {
                messages.push(Message::new(role, ""));
                continue;
            }
            match messages.last_mut() {
                Some(last) if last.role == role => last.content.push_str(fragment.text()),
                _ => messages.push(Message::new(role, fragment.text().as_str())),
            }
        }
        messages
    }

    /// Flattens the transcript into a single prompt.
    pub fn render(&self, format: &PromptFormat) -> String {
        let mut prompt = String::new();
        for fragment in &self.fragments {
            match (fragment.kind(), fragment.role()) {
                (FragmentKind::RoleMarker, Some(role)) => prompt.push_str(format.prefix(*role)),
                _ => prompt.push_str(fragment.text()),
            }
        }
        prompt
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

impl FromIterator<Fragment> for Transcript {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        Self {
            fragments: iter.into_iter().collect(),
        }
    }
}
