//! Flattening rules for single-turn backends.

use crate::Role;
use serde::{Deserialize, Serialize};

/// How a transcript is rendered into one prompt string.
///
/// Each role marker is replaced by the role's prefix; text is copied as-is.
///
/// # Examples
///
/// ```
/// use cantata_core::{PromptFormat, Role};
///
/// let format = PromptFormat::default().with_user_prefix("\nQ: ".to_string());
/// assert_eq!(format.prefix(Role::User), "\nQ: ");
/// assert_eq!(format.default_stop().as_deref(), Some("\n\nHuman:"));
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
pub struct PromptFormat {
    /// Inserted where a system message starts
    #[serde(default)]
    system_prefix: String,
    /// Inserted where a user message starts
    #[serde(default = "default_user_prefix")]
    user_prefix: String,
    /// Inserted where an assistant message starts
    #[serde(default = "default_assistant_prefix")]
    assistant_prefix: String,
    /// Stop sequence used when a generation directive names none
    #[serde(default = "default_stop")]
    default_stop: Option<String>,
}

fn default_user_prefix() -> String {
    "\n\nHuman: ".to_string()
}

fn default_assistant_prefix() -> String {
    "\n\nAssistant: ".to_string()
}

fn default_stop() -> Option<String> {
    Some("\n\nHuman:".to_string())
}

impl Default for PromptFormat {
    fn default() -> Self {
        Self {
            system_prefix: String::new(),
            user_prefix: default_user_prefix(),
            assistant_prefix: default_assistant_prefix(),
            default_stop: default_stop(),
        }
    }
}

impl PromptFormat {
    /// Prefix for a role.
    pub fn prefix(&self, role: Role) -> &str {
        match role {
            Role::System => &self.system_prefix,
            Role::User => &self.user_prefix,
            Role::Assistant => &self.assistant_prefix,
        }
    }
}
