//! Credential material extracted from a request by a scheme.

use std::fmt;

/// Opaque credential handed from an authentication scheme to the providers.
///
/// A scheme that finds nothing to extract returns `None` instead; absence
/// is not an error. `Debug` never prints secrets.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    UsernamePassword { username: String, password: String },
    Token(String),
}

impl Credential {
    pub fn username_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credential::UsernamePassword {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Credential::Token(token.into())
    }

    /// The username, for credentials that carry one.
    pub fn username(&self) -> Option<&str> {
        match self {
            Credential::UsernamePassword { username, .. } => Some(username),
            Credential::Token(_) => None,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"[redacted]")
                .finish(),
            Credential::Token(_) => f.debug_tuple("Token").field(&"[redacted]").finish(),
        }
    }
}
