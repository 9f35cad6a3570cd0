//! In-memory role provider.

use std::collections::{BTreeSet, HashMap};

use crate::http::security::config::RoleProvider;
use crate::http::security::identity::{Principal, Role};

/// Static mapping from principal name to roles.
///
/// Unknown principals get no roles. Grants for the same name accumulate.
#[derive(Clone, Debug, Default)]
pub struct MemoryRoleProvider {
    roles: HashMap<String, BTreeSet<Role>>,
}

impl MemoryRoleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `roles` to `name`.
    ///
    /// # Example
    /// ```ignore
    /// let roles = MemoryRoleProvider::new()
    ///     .with_roles("alice", &["reader"])
    ///     .with_roles("admin", &["ADMIN", "reader"]);
    /// ```
    pub fn with_roles(mut self, name: &str, roles: &[&str]) -> Self {
        self.roles
            .entry(name.to_string())
            .or_default()
            .extend(roles.iter().map(|r| Role::new(*r)));
        self
    }

    pub fn get_roles(&self, name: &str) -> Option<&BTreeSet<Role>> {
        self.roles.get(name)
    }
}

impl RoleProvider for MemoryRoleProvider {
    fn load_roles(&self, principal: &dyn Principal) -> BTreeSet<Role> {
        self.roles
            .get(principal.name())
            .cloned()
            .unwrap_or_default()
    }
}
