//! HTTP Basic authentication scheme.
//!
//! # Feature Flag
//! Requires the `http-basic` feature (enabled by default).

use actix_web::http::{header, StatusCode};
use base64::prelude::*;

use crate::http::security::config::AuthenticationScheme;
use crate::http::security::context::AuthContext;
use crate::http::security::credential::Credential;

/// Parses an `Authorization: Basic <base64(username:password)>` value.
pub fn decode_basic_auth(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// HTTP Basic configuration.
#[derive(Clone, Debug)]
pub struct HttpBasicConfig {
    realm: String,
}

impl HttpBasicConfig {
    /// Configuration with the default realm `Restricted`.
    pub fn new() -> Self {
        HttpBasicConfig {
            realm: "Restricted".to_string(),
        }
    }

    /// Sets the realm announced in `WWW-Authenticate`.
    ///
    /// # Example
    /// ```ignore
    /// let config = HttpBasicConfig::new().realm("MyApplication");
    /// ```
    pub fn realm(mut self, realm: &str) -> Self {
        self.realm = realm.to_string();
        self
    }

    pub fn get_realm(&self) -> &str {
        &self.realm
    }

    /// The `WWW-Authenticate` header value.
    pub fn www_authenticate_header(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm)
    }
}

impl Default for HttpBasicConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Solicits credentials with a `401` challenge and reads them back from the
/// `Authorization` header.
#[derive(Clone, Debug, Default)]
pub struct HttpBasicScheme {
    config: HttpBasicConfig,
}

impl HttpBasicScheme {
    pub fn new(config: HttpBasicConfig) -> Self {
        HttpBasicScheme { config }
    }

    pub fn config(&self) -> &HttpBasicConfig {
        &self.config
    }
}

impl AuthenticationScheme for HttpBasicScheme {
    fn is_authentication_request(&self, ctx: &dyn AuthContext) -> bool {
        ctx.header(header::AUTHORIZATION.as_str())
            .is_some_and(|value| value.starts_with("Basic "))
    }

    fn challenge_client(&self, ctx: &dyn AuthContext) {
        ctx.add_header(
            header::WWW_AUTHENTICATE.as_str(),
            &self.config.www_authenticate_header(),
        );
        ctx.send_status(StatusCode::UNAUTHORIZED);
    }

    fn build_credential(&self, ctx: &dyn AuthContext) -> Option<Credential> {
        let value = ctx.header(header::AUTHORIZATION.as_str())?;
        let (username, password) = decode_basic_auth(&value)?;
        Some(Credential::username_password(username, password))
    }
}
