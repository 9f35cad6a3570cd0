//! Resuming the originally requested URI after login.
//!
//! Two strategies:
//! - **Forward** (default): dispatch in-process to the original target.
//!   The HTTP method and body are preserved and the fresh identity travels
//!   with the forwarded request.
//! - **Redirect**: a `302` to the original URI. Used only when the URI
//!   contains a redirect marker, for dev-mode clients that cannot follow a
//!   forward (GWT hosted mode's `gwt.codesvr` parameter by default).
//!
//! Either failure surfaces as [`AuthError::NavigationFailed`]; it does not
//! undo the authentication or the storage write-back.

use crate::http::error::AuthError;
use crate::http::security::context::AuthContext;
use crate::http::security::identity::Identity;

/// Marker of the GWT hosted-mode code server.
pub const GWT_CODE_SERVER_MARKER: &str = "gwt.codesvr";

/// How navigation to the original URI resumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// `302` to the full original URI.
    Redirect(String),
    /// In-process dispatch to the original URI minus the context path.
    Forward(String),
}

/// Chooses and performs post-login navigation.
#[derive(Debug, Clone)]
pub struct NavigationResolver {
    redirect_markers: Vec<String>,
}

impl NavigationResolver {
    /// Resolver redirecting only for [`GWT_CODE_SERVER_MARKER`].
    pub fn new() -> Self {
        NavigationResolver {
            redirect_markers: vec![GWT_CODE_SERVER_MARKER.to_string()],
        }
    }

    /// Adds a substring that forces the redirect strategy.
    pub fn redirect_marker(mut self, marker: &str) -> Self {
        if !self.redirect_markers.iter().any(|m| m == marker) {
            self.redirect_markers.push(marker.to_string());
        }
        self
    }

    pub fn get_redirect_markers(&self) -> &[String] {
        &self.redirect_markers
    }

    fn use_redirect(&self, original: &str) -> bool {
        self.redirect_markers
            .iter()
            .any(|marker| original.contains(marker.as_str()))
    }

    /// Decides the strategy for `original` without performing it.
    pub fn resolve(&self, original: &str, context_path: &str) -> Navigation {
        if self.use_redirect(original) {
            return Navigation::Redirect(original.to_string());
        }

        let path = if context_path.is_empty() {
            original
        } else {
            original.strip_prefix(context_path).unwrap_or(original)
        };
        Navigation::Forward(path.to_string())
    }

    /// Resolves and performs navigation on `ctx`.
    pub fn navigate(
        &self,
        ctx: &dyn AuthContext,
        original: &str,
        identity: &Identity,
    ) -> Result<(), AuthError> {
        let navigation = self.resolve(original, ctx.context_path());
        tracing::debug!(?navigation, "resuming original request");

        let result = match &navigation {
            Navigation::Redirect(location) => ctx.send_redirect(location),
            Navigation::Forward(path) => ctx.forward(path, identity),
        };

        result.map_err(|e| {
            let reason = match e {
                AuthError::NavigationFailed { reason } => reason,
                other => other.to_string(),
            };
            tracing::warn!(%reason, "unable to resume original request");
            AuthError::NavigationFailed { reason }
        })
    }
}

impl Default for NavigationResolver {
    fn default() -> Self {
        Self::new()
    }
}
