//! Per-directive execution context.

use crate::{OutputPath, Role};

/// Role and output address in effect for the directive being executed.
///
/// Derived fresh for every recursive step; never stored in run state.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct Context {
    /// Role fragments are attributed to, `None` outside any role wrapper
    role: Option<Role>,
    /// Output path the current subtree contributes to
    address: OutputPath,
}

impl Context {
    /// The context a batch starts from: no role, root address.
    pub fn root() -> Self {
        Self::default()
    }

    /// Same address, different role.
    pub fn with_role(&self, role: Role) -> Self {
        Self {
            role: Some(role),
            address: self.address.clone(),
        }
    }

    /// Same role, different address.
    pub fn with_address(&self, address: OutputPath) -> Self {
        Self {
            role: self.role,
            address,
        }
    }
}
