//! Remember-me storage provider.
//!
//! Persists only the principal name in a signed cookie:
//!
//! ```text
//! base64url(username:expiry:base64url(hmac_sha256(key, "username:expiry")))
//! ```
//!
//! A valid cookie restores a bare principal. The manager then reloads its
//! roles and marks the identity with the remember-me role.
//!
//! # Feature Flag
//! Requires the `remember-me` feature (enabled by default).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use actix_web::cookie::{Cookie, SameSite};
use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::http::error::AuthError;
use crate::http::security::config::{StorageProvider, StoredPrincipal};
use crate::http::security::context::AuthContext;
use crate::http::security::identity::{Identity, UserPrincipal};

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Remember-Me Configuration
// =============================================================================

/// Remember-me configuration.
#[derive(Clone)]
pub struct RememberMeConfig {
    /// Secret key for token signing
    key: String,
    token_validity: Duration,
    cookie_name: String,
    cookie_path: String,
    /// None = current domain
    cookie_domain: Option<String>,
    cookie_secure: bool,
    cookie_http_only: bool,
    cookie_same_site: SameSite,
    /// Form parameter of the remember-me checkbox
    parameter_name: String,
    /// Remember every login, ignoring the checkbox
    always_remember: bool,
}

impl RememberMeConfig {
    /// Configuration signing tokens with `key`.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            token_validity: Duration::from_secs(14 * 24 * 60 * 60),
            cookie_name: "remember-me".to_string(),
            cookie_path: "/".to_string(),
            cookie_domain: None,
            cookie_secure: true,
            cookie_http_only: true,
            cookie_same_site: SameSite::Lax,
            parameter_name: "remember-me".to_string(),
            always_remember: false,
        }
    }

    pub fn token_validity_days(mut self, days: u64) -> Self {
        self.token_validity = Duration::from_secs(days.saturating_mul(24 * 60 * 60));
        self
    }

    pub fn token_validity_seconds(mut self, seconds: u64) -> Self {
        self.token_validity = Duration::from_secs(seconds);
        self
    }

    pub fn cookie_name(mut self, name: &str) -> Self {
        self.cookie_name = name.to_string();
        self
    }

    pub fn cookie_path(mut self, path: &str) -> Self {
        self.cookie_path = path.to_string();
        self
    }

    pub fn cookie_domain(mut self, domain: &str) -> Self {
        self.cookie_domain = Some(domain.to_string());
        self
    }

    pub fn cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn cookie_http_only(mut self, http_only: bool) -> Self {
        self.cookie_http_only = http_only;
        self
    }

    pub fn cookie_same_site(mut self, same_site: SameSite) -> Self {
        self.cookie_same_site = same_site;
        self
    }

    pub fn parameter_name(mut self, name: &str) -> Self {
        self.parameter_name = name.to_string();
        self
    }

    pub fn always_remember(mut self, always: bool) -> Self {
        self.always_remember = always;
        self
    }

    pub fn get_token_validity(&self) -> Duration {
        self.token_validity
    }

    pub fn get_cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn get_parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn is_always_remember(&self) -> bool {
        self.always_remember
    }
}

impl std::fmt::Debug for RememberMeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RememberMeConfig")
            .field("key", &"[redacted]")
            .field("token_validity", &self.token_validity)
            .field("cookie_name", &self.cookie_name)
            .field("parameter_name", &self.parameter_name)
            .field("always_remember", &self.always_remember)
            .finish()
    }
}

// =============================================================================
// Remember-Me Token
// =============================================================================

/// Signed remember-me token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RememberMeToken {
    pub username: String,
    /// Seconds since the UNIX epoch
    pub expiry: u64,
    pub signature: Vec<u8>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn signer(key: &str, username: &str, expiry: u64) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).ok()?;
    mac.update(format!("{username}:{expiry}").as_bytes());
    Some(mac)
}

impl RememberMeToken {
    /// Signs a token for `username` valid for `validity` from now.
    pub fn new(username: &str, validity: Duration, key: &str) -> Option<Self> {
        let expiry = now_secs().saturating_add(validity.as_secs());
        let signature = signer(key, username, expiry)?.finalize().into_bytes().to_vec();
        Some(Self {
            username: username.to_string(),
            expiry,
            signature,
        })
    }

    pub fn encode(&self) -> String {
        let data = format!(
            "{}:{}:{}",
            self.username,
            self.expiry,
            BASE64_URL_SAFE_NO_PAD.encode(&self.signature)
        );
        BASE64_URL_SAFE_NO_PAD.encode(data.as_bytes())
    }

    /// Parses a cookie value. Usernames may contain `:`.
    pub fn decode(encoded: &str) -> Option<Self> {
        let decoded = BASE64_URL_SAFE_NO_PAD.decode(encoded).ok()?;
        let data = String::from_utf8(decoded).ok()?;

        let mut parts = data.rsplitn(3, ':');
        let signature = BASE64_URL_SAFE_NO_PAD.decode(parts.next()?).ok()?;
        let expiry = parts.next()?.parse().ok()?;
        let username = parts.next()?;
        if username.is_empty() {
            return None;
        }

        Some(Self {
            username: username.to_string(),
            expiry,
            signature,
        })
    }

    pub fn is_expired(&self) -> bool {
        now_secs() > self.expiry
    }

    /// True when unexpired and signed with `key`.
    pub fn validate(&self, key: &str) -> bool {
        if self.is_expired() {
            return false;
        }
        signer(key, &self.username, self.expiry)
            .is_some_and(|mac| mac.verify_slice(&self.signature).is_ok())
    }
}

// =============================================================================
// Remember-Me Storage Provider
// =============================================================================

/// Storage provider backed by a signed remember-me cookie.
///
/// `store` writes or refreshes the cookie when remembering is always on,
/// when the login form's remember-me parameter is truthy, or when the
/// request already carried a valid cookie. `cleanup` expires it.
#[derive(Clone, Debug)]
pub struct RememberMeStorageProvider {
    config: RememberMeConfig,
}

impl RememberMeStorageProvider {
    pub fn new(config: RememberMeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RememberMeConfig {
        &self.config
    }

    /// The valid token presented with this request, if any.
    fn presented_token(&self, ctx: &dyn AuthContext) -> Option<RememberMeToken> {
        let value = ctx.cookie(&self.config.cookie_name)?;
        let token = RememberMeToken::decode(&value)?;
        if token.validate(&self.config.key) {
            Some(token)
        } else {
            tracing::debug!(user = %token.username, "rejecting remember-me cookie");
            None
        }
    }

    fn should_remember(&self, ctx: &dyn AuthContext) -> bool {
        self.config.always_remember
            || ctx
                .parameter(&self.config.parameter_name)
                .is_some_and(|value| is_truthy(&value))
            || self.presented_token(ctx).is_some()
    }

    fn cookie(&self, value: String, max_age: actix_web::cookie::time::Duration) -> Cookie<'static> {
        let mut cookie = Cookie::build(self.config.cookie_name.clone(), value)
            .path(self.config.cookie_path.clone())
            .max_age(max_age)
            .http_only(self.config.cookie_http_only)
            .same_site(self.config.cookie_same_site);

        if let Some(domain) = &self.config.cookie_domain {
            cookie = cookie.domain(domain.clone());
        }

        if self.config.cookie_secure {
            cookie = cookie.secure(true);
        }

        cookie.finish()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "on" | "yes" | "1"
    )
}

impl StorageProvider for RememberMeStorageProvider {
    fn load(&self, ctx: &dyn AuthContext) -> Option<StoredPrincipal> {
        let token = self.presented_token(ctx)?;
        Some(StoredPrincipal::Principal(Box::new(UserPrincipal::new(
            token.username,
        ))))
    }

    fn store(&self, ctx: &dyn AuthContext, identity: &Identity) -> Result<(), AuthError> {
        if !self.should_remember(ctx) {
            return Ok(());
        }

        let token = RememberMeToken::new(identity.name(), self.config.token_validity, &self.config.key)
            .ok_or_else(|| AuthError::storage("unable to sign remember-me token"))?;
        let max_age = actix_web::cookie::time::Duration::seconds(
            i64::try_from(self.config.token_validity.as_secs()).unwrap_or(i64::MAX),
        );
        ctx.add_cookie(self.cookie(token.encode(), max_age));
        tracing::debug!(user = identity.name(), "remember-me cookie issued");
        Ok(())
    }

    fn cleanup(&self, ctx: &dyn AuthContext) -> Result<(), AuthError> {
        ctx.add_cookie(self.cookie(String::new(), actix_web::cookie::time::Duration::ZERO));
        Ok(())
    }
}
