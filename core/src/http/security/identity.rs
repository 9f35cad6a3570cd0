//! Principal, role and identity model.
//!
//! # Overview
//! - [`Principal`] is what an authentication provider vouches for: a name.
//! - [`Role`] is a named grant, compared by name.
//! - [`Identity`] is the final result of authentication: a principal name
//!   plus every role collected for it. It is immutable; logging out discards
//!   it rather than editing it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::error::AuthError;

/// A verified entity, before roles are attached.
pub trait Principal: fmt::Debug + Send + Sync {
    /// Returns the principal name.
    fn name(&self) -> &str;
}

/// Plain principal returned by providers and remember-me storage.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserPrincipal {
    name: String,
}

impl UserPrincipal {
    pub fn new(name: impl Into<String>) -> Self {
        UserPrincipal { name: name.into() }
    }
}

impl Principal for UserPrincipal {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A named grant. Equality and ordering are by name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Reserved role marking an identity restored from persistent storage
    /// rather than freshly authenticated.
    pub const REMEMBER_ME: &'static str = "REMEMBER_ME";

    pub fn new(name: impl Into<String>) -> Self {
        Role(name.into())
    }

    /// The reserved remember-me role.
    pub fn remember_me() -> Self {
        Role::new(Self::REMEMBER_ME)
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Role::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Role(name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated identity: a principal name and its aggregated roles.
///
/// # Example
/// ```
/// use actix_authn_core::http::security::{Identity, Role};
///
/// let identity = Identity::new("alice", [Role::new("reader")]).unwrap();
///
/// assert_eq!(identity.name(), "alice");
/// assert!(identity.has_role("reader"));
/// assert!(!identity.is_remembered());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IdentityData")]
pub struct Identity {
    name: String,
    roles: BTreeSet<Role>,
}

impl Identity {
    /// Builds an identity.
    ///
    /// Fails with [`AuthError::InvalidCredentials`] when `name` is empty:
    /// an identity always names someone.
    pub fn new<I, R>(name: impl Into<String>, roles: I) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Identity {
            name,
            roles: roles.into_iter().map(Into::into).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Role names in sorted order.
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(Role::name).collect()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.name() == role)
    }

    /// Checks if the identity has ANY of the specified roles (OR logic).
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Checks if the identity has ALL of the specified roles (AND logic).
    pub fn has_all_roles(&self, roles: &[&str]) -> bool {
        roles.iter().all(|role| self.has_role(role))
    }

    /// True when the identity was restored from persistent storage.
    pub fn is_remembered(&self) -> bool {
        self.has_role(Role::REMEMBER_ME)
    }
}

impl Principal for Identity {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Identity {{ name: {}, roles: {:?} }}",
            self.name,
            self.role_names()
        )
    }
}

#[derive(Deserialize)]
struct IdentityData {
    name: String,
    roles: BTreeSet<Role>,
}

impl TryFrom<IdentityData> for Identity {
    type Error = AuthError;

    fn try_from(data: IdentityData) -> Result<Self, Self::Error> {
        Identity::new(data.name, data.roles)
    }
}
