//! The authentication manager.
//!
//! # Overview
//! [`AuthenticationManager::authenticate`] resolves the identity of a request
//! by walking its collaborators in declaration order:
//!
//! 1. Storage providers are asked for a stored principal; the first hit
//!    wins. A stored full [`Identity`] is returned immediately.
//! 2. The resource manager says whether the resource needs authentication.
//! 3. With nothing restored, every scheme that is not handling its own login
//!    submission records the original URI and challenges the client. A
//!    resource that does not need authentication ends here with `None`.
//! 4. Credentials are tried scheme by scheme, provider by provider. The
//!    first success wins; an explicit failure aborts the whole attempt.
//! 5. Roles from every role provider are unioned, plus the remember-me role
//!    when the principal came from storage.
//! 6. The identity is stored back through every storage provider.
//! 7. A pending original URI for this session is consumed and navigation
//!    resumes to it.
//!
//! # Example
//! ```ignore
//! let manager = AuthenticationManager::builder()
//!     .scheme(FormLoginScheme::new(FormLoginConfig::new()))
//!     .provider(MemoryAuthenticationProvider::new().with_user("alice", "secret"))
//!     .role_provider(MemoryRoleProvider::new().with_roles("alice", &["reader"]))
//!     .storage_provider(SessionStorageProvider::new(SessionConfig::new()))
//!     .resource_manager(PatternResourceManager::new().permit("^/login$"))
//!     .build()?;
//! ```

mod builder;


use std::collections::BTreeSet;
use std::sync::Arc;

pub use builder::AuthenticationManagerBuilder;

use crate::http::error::AuthError;
use crate::http::security::config::{
    AuthenticationProvider, AuthenticationResult, AuthenticationScheme, ResourceManager,
    RoleProvider, StorageProvider, StoredPrincipal,
};
use crate::http::security::context::AuthContext;
use crate::http::security::identity::{Identity, Principal, Role};
use crate::http::security::navigation::NavigationResolver;
use crate::http::security::request_cache::RequestCache;

/// Chains schemes, providers, role providers and storage providers into a
/// single authentication decision.
///
/// One instance serves all requests concurrently. Its only mutable state is
/// the [`RequestCache`].
pub struct AuthenticationManager {
    schemes: Vec<Arc<dyn AuthenticationScheme>>,
    providers: Vec<Arc<dyn AuthenticationProvider>>,
    role_providers: Vec<Arc<dyn RoleProvider>>,
    storage_providers: Vec<Arc<dyn StorageProvider>>,
    resource_manager: Arc<dyn ResourceManager>,
    request_cache: RequestCache,
    navigation: NavigationResolver,
}

impl AuthenticationManager {
    pub fn builder() -> AuthenticationManagerBuilder {
        AuthenticationManagerBuilder::new()
    }

    /// The pending-request cache.
    pub fn request_cache(&self) -> &RequestCache {
        &self.request_cache
    }

    /// Resolves the identity of the current request.
    ///
    /// Returns `Ok(None)` when nothing was stored and the resource does not
    /// require authentication.
    ///
    /// # Errors
    /// - [`AuthError::InvalidCredentials`] when authentication was required
    ///   but no provider accepted a credential, or one rejected it.
    /// - [`AuthError::NavigationFailed`] when resuming the original request
    ///   failed. Authentication and storage have already happened by then.
    /// - Errors from storage providers' `store`.
    pub fn authenticate(&self, ctx: &dyn AuthContext) -> Result<Option<Identity>, AuthError> {
        let restored = self.restore(ctx);

        let (principal, is_remember_op) = match restored {
            Some(StoredPrincipal::Identity(identity)) => {
                tracing::debug!(user = identity.name(), "identity restored from storage");
                return Ok(Some(identity));
            }
            Some(StoredPrincipal::Principal(principal)) => {
                // Consulted once per call; does not gate a remembered principal.
                self.resource_manager.requires_authentication(ctx.resource());
                (principal, true)
            }
            None => {
                let requires_authentication =
                    self.resource_manager.requires_authentication(ctx.resource());

                if requires_authentication {
                    self.challenge(ctx);
                } else {
                    return Ok(None);
                }

                let principal = self
                    .find_principal(ctx)?
                    .ok_or(AuthError::InvalidCredentials)?;
                (principal, false)
            }
        };

        let identity = self.build_identity(principal.as_ref(), is_remember_op)?;

        for storage in &self.storage_providers {
            storage.store(ctx, &identity)?;
        }

        tracing::info!(
            user = identity.name(),
            roles = ?identity.role_names(),
            remember_me = is_remember_op,
            "authenticated"
        );

        self.resume_original_request(ctx, &identity)?;

        Ok(Some(identity))
    }

    /// Cleans up every storage provider, then invalidates the session.
    ///
    /// A cleanup failure propagates and the session is left untouched.
    pub fn logout(&self, ctx: &dyn AuthContext) -> Result<(), AuthError> {
        for storage in &self.storage_providers {
            storage.cleanup(ctx)?;
        }
        ctx.invalidate_session();
        tracing::info!("logged out");
        Ok(())
    }

    fn restore(&self, ctx: &dyn AuthContext) -> Option<StoredPrincipal> {
        self.storage_providers
            .iter()
            .find_map(|storage| storage.load(ctx))
    }

    /// Every scheme not handling its own login submission gets to challenge;
    /// schemes may emit independent side effects, so none is skipped.
    fn challenge(&self, ctx: &dyn AuthContext) {
        let original = original_uri(ctx);
        for (index, scheme) in self.schemes.iter().enumerate() {
            if scheme.is_authentication_request(ctx) {
                continue;
            }
            let session_id = ctx.session_id();
            tracing::debug!(scheme = index, uri = %original, "challenging client");
            self.request_cache.save(&session_id, original.clone());
            scheme.challenge_client(ctx);
        }
    }

    /// Scheme-major, provider-minor search for the first success.
    fn find_principal(
        &self,
        ctx: &dyn AuthContext,
    ) -> Result<Option<Box<dyn Principal>>, AuthError> {
        for (scheme_index, scheme) in self.schemes.iter().enumerate() {
            let Some(credential) = scheme.build_credential(ctx) else {
                continue;
            };

            for (provider_index, provider) in self.providers.iter().enumerate() {
                match provider.authenticate(&credential) {
                    AuthenticationResult::Success(principal) => {
                        tracing::debug!(
                            scheme = scheme_index,
                            provider = provider_index,
                            user = principal.name(),
                            "credential accepted"
                        );
                        return Ok(Some(principal));
                    }
                    AuthenticationResult::Failed => {
                        tracing::warn!(
                            scheme = scheme_index,
                            provider = provider_index,
                            user = credential.username(),
                            "credential rejected"
                        );
                        return Err(AuthError::InvalidCredentials);
                    }
                    AuthenticationResult::NotApplicable => {}
                }
            }
        }
        Ok(None)
    }

    fn build_identity(
        &self,
        principal: &dyn Principal,
        is_remember_op: bool,
    ) -> Result<Identity, AuthError> {
        let mut roles = BTreeSet::new();
        if is_remember_op {
            roles.insert(Role::remember_me());
        }
        for role_provider in &self.role_providers {
            roles.extend(role_provider.load_roles(principal));
        }
        Identity::new(principal.name(), roles)
    }

    fn resume_original_request(
        &self,
        ctx: &dyn AuthContext,
        identity: &Identity,
    ) -> Result<(), AuthError> {
        let Some(original) = self.request_cache.take(&ctx.session_id()) else {
            return Ok(());
        };
        if original.is_empty() || ctx.is_committed() {
            return Ok(());
        }
        self.navigation.navigate(ctx, &original, identity)
    }
}

/// Path plus query string, as the client asked for it.
fn original_uri(ctx: &dyn AuthContext) -> String {
    let query = ctx.query_string();
    if query.is_empty() {
        ctx.request_uri().to_string()
    } else {
        format!("{}?{}", ctx.request_uri(), query)
    }
}
