//! Session-backed storage provider.
//!
//! Keeps the authenticated [`Identity`] in the actix session as JSON, so
//! later requests of the same session are resolved without re-running
//! authentication.
//!
//! # Example
//! ```rust,ignore
//! use actix_session::SessionMiddleware;
//! use actix_session::storage::CookieSessionStore;
//!
//! let manager = AuthenticationManager::builder()
//!     // ...
//!     .storage_provider(SessionStorageProvider::new(SessionConfig::new()))
//!     .build()?;
//!
//! App::new()
//!     .wrap(SecurityTransform::new(manager))
//!     .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
//! ```

use crate::http::error::AuthError;
use crate::http::security::config::{StorageProvider, StoredPrincipal};
use crate::http::security::context::AuthContext;
use crate::http::security::identity::Identity;

// =============================================================================
// Session Configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session key holding the serialized identity
    identity_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            identity_key: "security_identity".to_string(),
        }
    }

    pub fn identity_key(mut self, key: &str) -> Self {
        self.identity_key = key.to_string();
        self
    }

    pub fn get_identity_key(&self) -> &str {
        &self.identity_key
    }
}

// =============================================================================
// Session Storage Provider
// =============================================================================

/// Stores the full identity in the session.
///
/// `load` returns [`StoredPrincipal::Identity`], so a session hit
/// short-circuits authentication. An entry that no longer deserializes is
/// treated as absent.
#[derive(Debug, Clone, Default)]
pub struct SessionStorageProvider {
    config: SessionConfig,
}

impl SessionStorageProvider {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl StorageProvider for SessionStorageProvider {
    fn load(&self, ctx: &dyn AuthContext) -> Option<StoredPrincipal> {
        let json = ctx.session_attribute(&self.config.identity_key)?;
        match serde_json::from_str::<Identity>(&json) {
            Ok(identity) => Some(StoredPrincipal::Identity(identity)),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session identity");
                None
            }
        }
    }

    fn store(&self, ctx: &dyn AuthContext, identity: &Identity) -> Result<(), AuthError> {
        let json = serde_json::to_string(identity).map_err(|e| AuthError::storage(e.to_string()))?;
        ctx.set_session_attribute(&self.config.identity_key, json)
    }

    fn cleanup(&self, ctx: &dyn AuthContext) -> Result<(), AuthError> {
        ctx.remove_session_attribute(&self.config.identity_key);
        Ok(())
    }
}
