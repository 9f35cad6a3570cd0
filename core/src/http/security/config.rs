//! Collaborator contracts of the authentication manager.
//!
//! The manager holds ordered lists of each collaborator and walks them
//! explicitly; declaration order is part of the behaviour:
//!
//! - [`StorageProvider`] restores and persists identities across requests.
//! - [`AuthenticationScheme`] challenges clients and extracts credentials.
//! - [`AuthenticationProvider`] verifies a credential.
//! - [`RoleProvider`] grants roles to a verified principal.
//! - [`ResourceManager`] says whether a resource needs authentication.
//!
//! Implementations are shared across concurrent requests and must be
//! `Send + Sync`.

use std::collections::BTreeSet;
use std::fmt;

use crate::http::error::AuthError;
use crate::http::security::context::AuthContext;
use crate::http::security::credential::Credential;
use crate::http::security::identity::{Identity, Principal, Role};

/// What a storage provider found for the current request.
#[derive(Debug)]
pub enum StoredPrincipal {
    /// A complete identity. Returned as-is, without role reload or re-store.
    Identity(Identity),
    /// A bare principal, e.g. from a remember-me cookie. Roles are loaded and
    /// the remember-me role is added.
    Principal(Box<dyn Principal>),
}

impl StoredPrincipal {
    pub fn name(&self) -> &str {
        match self {
            StoredPrincipal::Identity(identity) => identity.name(),
            StoredPrincipal::Principal(principal) => principal.name(),
        }
    }
}

/// Persists an authenticated identity across requests.
///
/// All methods must be safe to call when no session exists yet.
pub trait StorageProvider: Send + Sync {
    fn load(&self, ctx: &dyn AuthContext) -> Option<StoredPrincipal>;

    fn store(&self, ctx: &dyn AuthContext, identity: &Identity) -> Result<(), AuthError>;

    fn cleanup(&self, ctx: &dyn AuthContext) -> Result<(), AuthError>;
}

/// Strategy for soliciting and extracting credentials.
pub trait AuthenticationScheme: Send + Sync {
    /// True if this request is itself a login submission for this scheme.
    fn is_authentication_request(&self, ctx: &dyn AuthContext) -> bool;

    /// Writes this scheme's challenge (redirect, `WWW-Authenticate`, ...).
    fn challenge_client(&self, ctx: &dyn AuthContext);

    /// Extracts credential material, or `None` if the scheme does not apply.
    fn build_credential(&self, ctx: &dyn AuthContext) -> Option<Credential>;
}

/// Outcome of asking one provider about one credential.
pub enum AuthenticationResult {
    /// The credential is valid for this principal. Stops the search.
    Success(Box<dyn Principal>),
    /// The credential was explicitly rejected. Aborts the whole attempt.
    Failed,
    /// This provider does not handle the credential. The next one is asked.
    NotApplicable,
}

impl fmt::Debug for AuthenticationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticationResult::Success(principal) => {
                f.debug_tuple("Success").field(&principal.name()).finish()
            }
            AuthenticationResult::Failed => f.write_str("Failed"),
            AuthenticationResult::NotApplicable => f.write_str("NotApplicable"),
        }
    }
}

/// Verifies credentials.
pub trait AuthenticationProvider: Send + Sync {
    fn authenticate(&self, credential: &Credential) -> AuthenticationResult;
}

/// Grants roles to a verified principal.
pub trait RoleProvider: Send + Sync {
    fn load_roles(&self, principal: &dyn Principal) -> BTreeSet<Role>;
}

/// Decides which resources require an authenticated identity.
pub trait ResourceManager: Send + Sync {
    fn requires_authentication(&self, resource: &str) -> bool;
}

impl<F> ResourceManager for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn requires_authentication(&self, resource: &str) -> bool {
        self(resource)
    }
}
