use std::sync::Arc;

use crate::http::error::AuthError;
use crate::http::security::config::{
    AuthenticationProvider, AuthenticationScheme, ResourceManager, RoleProvider, StorageProvider,
};
use crate::http::security::navigation::NavigationResolver;
use crate::http::security::request_cache::RequestCache;

use super::AuthenticationManager;

/// Collects the ordered collaborator lists of an [`AuthenticationManager`].
///
/// Collaborators are consulted in the order they are added. Every list must
/// be non-empty and a resource manager is required; [`build`](Self::build)
/// fails with [`AuthError::Configuration`] otherwise.
#[derive(Default)]
pub struct AuthenticationManagerBuilder {
    schemes: Vec<Arc<dyn AuthenticationScheme>>,
    providers: Vec<Arc<dyn AuthenticationProvider>>,
    role_providers: Vec<Arc<dyn RoleProvider>>,
    storage_providers: Vec<Arc<dyn StorageProvider>>,
    resource_manager: Option<Arc<dyn ResourceManager>>,
    request_cache: Option<RequestCache>,
    navigation: NavigationResolver,
}

impl AuthenticationManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an authentication scheme.
    pub fn scheme<S: AuthenticationScheme + 'static>(mut self, scheme: S) -> Self {
        self.schemes.push(Arc::new(scheme));
        self
    }

    /// Appends an authentication provider.
    pub fn provider<P: AuthenticationProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Appends a role provider.
    pub fn role_provider<R: RoleProvider + 'static>(mut self, role_provider: R) -> Self {
        self.role_providers.push(Arc::new(role_provider));
        self
    }

    /// Appends a storage provider.
    pub fn storage_provider<S: StorageProvider + 'static>(mut self, storage: S) -> Self {
        self.storage_providers.push(Arc::new(storage));
        self
    }

    pub fn resource_manager<R: ResourceManager + 'static>(mut self, resource_manager: R) -> Self {
        self.resource_manager = Some(Arc::new(resource_manager));
        self
    }

    /// Shares an existing pending-request cache instead of creating one.
    pub fn request_cache(mut self, cache: RequestCache) -> Self {
        self.request_cache = Some(cache);
        self
    }

    /// Adds a URI substring that makes post-login navigation redirect
    /// instead of forward.
    pub fn redirect_marker(mut self, marker: &str) -> Self {
        self.navigation = self.navigation.redirect_marker(marker);
        self
    }

    pub fn build(self) -> Result<AuthenticationManager, AuthError> {
        require_non_empty("authentication schemes", &self.schemes)?;
        require_non_empty("authentication providers", &self.providers)?;
        require_non_empty("role providers", &self.role_providers)?;
        require_non_empty("storage providers", &self.storage_providers)?;
        let resource_manager = self
            .resource_manager
            .ok_or_else(|| AuthError::Configuration("resource manager is required".into()))?;

        Ok(AuthenticationManager {
            schemes: self.schemes,
            providers: self.providers,
            role_providers: self.role_providers,
            storage_providers: self.storage_providers,
            resource_manager,
            request_cache: self.request_cache.unwrap_or_default(),
            navigation: self.navigation,
        })
    }
}

fn require_non_empty<T>(name: &str, items: &[T]) -> Result<(), AuthError> {
    if items.is_empty() {
        return Err(AuthError::Configuration(format!("{name} must not be empty")));
    }
    Ok(())
}
