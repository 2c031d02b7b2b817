//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who a message (and every fragment inside it) is attributed to.
///
/// Text emitted outside any role wrapper carries no role; that is modelled as
/// `Option<Role>::None` rather than an extra variant.
///
/// # Examples
///
/// ```
/// use cantata_core::Role;
///
/// assert_ne!(Role::User, Role::Assistant);
/// assert_eq!(format!("{}", Role::System), "system");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and context for the model
    #[display("system")]
    System,
    /// Turns written by the caller
    #[display("user")]
    User,
    /// Turns written by the model
    #[display("assistant")]
    Assistant,
}
