//! Form login authentication scheme.
//!
//! Unauthenticated clients are redirected to the login page. The page posts
//! `username` and `password` to the processing URL, where this scheme turns
//! them into a credential.
//!
//! # Example
//! ```rust,ignore
//! use actix_authn_core::http::security::form_login::{FormLoginConfig, FormLoginScheme};
//!
//! let form_login = FormLoginScheme::new(
//!     FormLoginConfig::new()
//!         .login_page("/signin")
//!         .login_processing_url("/signin/check"),
//! );
//! ```
//!
//! # Feature Flag
//! Requires the `form-login` feature (enabled by default).

use crate::http::security::config::AuthenticationScheme;
use crate::http::security::context::AuthContext;
use crate::http::security::credential::Credential;

// =============================================================================
// Form Login Configuration
// =============================================================================

/// Form login configuration.
///
/// URLs are relative to the application's context path.
#[derive(Clone, Debug)]
pub struct FormLoginConfig {
    /// Login page clients are redirected to
    login_page: String,
    /// URL the login form posts to
    login_processing_url: String,
    username_parameter: String,
    password_parameter: String,
}

impl Default for FormLoginConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FormLoginConfig {
    pub fn new() -> Self {
        Self {
            login_page: "/login".to_string(),
            login_processing_url: "/login/check".to_string(),
            username_parameter: "username".to_string(),
            password_parameter: "password".to_string(),
        }
    }

    pub fn login_page(mut self, url: &str) -> Self {
        self.login_page = url.to_string();
        self
    }

    pub fn login_processing_url(mut self, url: &str) -> Self {
        self.login_processing_url = url.to_string();
        self
    }

    pub fn username_parameter(mut self, param: &str) -> Self {
        self.username_parameter = param.to_string();
        self
    }

    pub fn password_parameter(mut self, param: &str) -> Self {
        self.password_parameter = param.to_string();
        self
    }

    // Getters

    pub fn get_login_page(&self) -> &str {
        &self.login_page
    }

    pub fn get_login_processing_url(&self) -> &str {
        &self.login_processing_url
    }

    pub fn get_username_parameter(&self) -> &str {
        &self.username_parameter
    }

    pub fn get_password_parameter(&self) -> &str {
        &self.password_parameter
    }
}

// =============================================================================
// Form Login Scheme
// =============================================================================

/// Redirect-to-login-page authentication scheme.
#[derive(Clone, Debug, Default)]
pub struct FormLoginScheme {
    config: FormLoginConfig,
}

impl FormLoginScheme {
    pub fn new(config: FormLoginConfig) -> Self {
        FormLoginScheme { config }
    }

    pub fn config(&self) -> &FormLoginConfig {
        &self.config
    }
}

impl AuthenticationScheme for FormLoginScheme {
    fn is_authentication_request(&self, ctx: &dyn AuthContext) -> bool {
        let path = ctx.request_uri();
        path.strip_prefix(ctx.context_path())
            .is_some_and(|path| path == self.config.login_processing_url)
    }

    fn challenge_client(&self, ctx: &dyn AuthContext) {
        let location = format!("{}{}", ctx.context_path(), self.config.login_page);
        if let Err(e) = ctx.send_redirect(&location) {
            tracing::warn!(error = %e, "unable to redirect to login page");
        }
    }

    fn build_credential(&self, ctx: &dyn AuthContext) -> Option<Credential> {
        if !self.is_authentication_request(ctx) {
            return None;
        }
        let username = ctx.parameter(&self.config.username_parameter)?;
        let password = ctx.parameter(&self.config.password_parameter)?;
        Some(Credential::username_password(username, password))
    }
}
