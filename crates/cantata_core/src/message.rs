//! Chat messages reconstructed from a transcript.

use crate::Role;
use serde::{Deserialize, Serialize};

/// One role-tagged message as sent to a chat backend.
///
/// # Examples
///
/// ```
/// use cantata_core::{Message, MessageBuilder, Role};
///
/// let message = MessageBuilder::default()
///     .role(Role::User)
///     .content("Hello!")
///     .build()
///     .unwrap();
///
/// assert_eq!(message, Message::new(Role::User, "Hello!"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// Text content of the message
    pub content: String,
}

impl Message {
    /// Create a message from a role and its text.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Whether the message carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
