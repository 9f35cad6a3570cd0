//! In-memory authentication provider.

use std::collections::HashMap;

use subtle::ConstantTimeEq;

use crate::http::security::config::{AuthenticationProvider, AuthenticationResult};
use crate::http::security::credential::Credential;
use crate::http::security::identity::UserPrincipal;

/// Username/password store held in memory.
///
/// Answers [`AuthenticationResult::NotApplicable`] for unknown users and for
/// credentials that are not username/password, so later providers still get
/// a chance. A known user with the wrong password is
/// [`AuthenticationResult::Failed`].
///
/// Passwords are kept and compared in plain text, in constant time. Put a
/// hashing provider in front of real user stores.
///
/// # Example
/// ```
/// use actix_authn_core::http::security::{
///     AuthenticationProvider, AuthenticationResult, Credential, MemoryAuthenticationProvider,
/// };
///
/// let provider = MemoryAuthenticationProvider::new().with_user("alice", "secret");
///
/// let result = provider.authenticate(&Credential::username_password("alice", "secret"));
/// assert!(matches!(result, AuthenticationResult::Success(_)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryAuthenticationProvider {
    users: HashMap<String, String>,
}

impl MemoryAuthenticationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user. A username already present is kept and the new entry
    /// skipped.
    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        use std::collections::hash_map::Entry;
        match self.users.entry(username.to_string()) {
            Entry::Occupied(e) => {
                tracing::warn!(user = %e.key(), "user already exists, skipping");
            }
            Entry::Vacant(e) => {
                e.insert(password.to_string());
            }
        }
        self
    }

    pub fn contains_user(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }
}

impl AuthenticationProvider for MemoryAuthenticationProvider {
    fn authenticate(&self, credential: &Credential) -> AuthenticationResult {
        let Credential::UsernamePassword { username, password } = credential else {
            return AuthenticationResult::NotApplicable;
        };

        match self.users.get(username) {
            None => AuthenticationResult::NotApplicable,
            Some(expected) if bool::from(expected.as_bytes().ct_eq(password.as_bytes())) => {
                AuthenticationResult::Success(Box::new(UserPrincipal::new(username.as_str())))
            }
            Some(_) => AuthenticationResult::Failed,
        }
    }
}
