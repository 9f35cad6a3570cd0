//! URL-pattern resource manager.

use regex::Regex;

use crate::http::security::config::ResourceManager;

#[derive(Debug, Clone)]
struct ResourceRule {
    pattern: Regex,
    requires_authentication: bool,
}

/// Ordered regex rules deciding which resources need authentication.
///
/// The first matching rule wins. Resources matching no rule fall back to
/// the default, which requires authentication.
///
/// # Example
/// ```
/// use actix_authn_core::http::security::{PatternResourceManager, ResourceManager};
///
/// let resources = PatternResourceManager::new()
///     .permit("^/login")
///     .permit("^/public/.*")
///     .protect("^/api/.*");
///
/// assert!(!resources.requires_authentication("/public/about"));
/// assert!(resources.requires_authentication("/api/orders"));
/// assert!(resources.requires_authentication("/anything-else"));
/// ```
#[derive(Debug, Clone)]
pub struct PatternResourceManager {
    rules: Vec<ResourceRule>,
    default_requires_authentication: bool,
}

impl PatternResourceManager {
    pub fn new() -> Self {
        PatternResourceManager {
            rules: Vec::new(),
            default_requires_authentication: true,
        }
    }

    /// Resources matching `url_regex` are reachable anonymously.
    pub fn permit(self, url_regex: &str) -> Self {
        self.add_rule(url_regex, false)
    }

    /// Resources matching `url_regex` require authentication.
    pub fn protect(self, url_regex: &str) -> Self {
        self.add_rule(url_regex, true)
    }

    /// Outcome for resources no rule matches (default: `true`).
    pub fn default_requires_authentication(mut self, requires: bool) -> Self {
        self.default_requires_authentication = requires;
        self
    }

    pub fn get_default_requires_authentication(&self) -> bool {
        self.default_requires_authentication
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn add_rule(mut self, url_regex: &str, requires_authentication: bool) -> Self {
        match Regex::new(url_regex) {
            Ok(pattern) => self.rules.push(ResourceRule {
                pattern,
                requires_authentication,
            }),
            Err(e) => tracing::warn!(pattern = url_regex, error = %e, "ignoring invalid resource pattern"),
        }
        self
    }
}

impl Default for PatternResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceManager for PatternResourceManager {
    fn requires_authentication(&self, resource: &str) -> bool {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(resource))
            .map(|rule| rule.requires_authentication)
            .unwrap_or(self.default_requires_authentication)
    }
}
