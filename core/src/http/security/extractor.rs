//! Extractors for the identity resolved by the middleware.

use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::http::error::AuthError;
use crate::http::security::identity::Identity;

/// Extractor for the authenticated identity.
///
/// # Usage
/// ```ignore
/// use actix_authn_core::http::security::AuthenticatedSubject;
///
/// async fn handler(subject: AuthenticatedSubject) -> impl Responder {
///     format!("Hello, {}!", subject.name())
/// }
/// ```
///
/// # Errors
/// Returns `401 Unauthorized` if the request is anonymous.
#[derive(Debug, Clone)]
pub struct AuthenticatedSubject(Identity);

impl AuthenticatedSubject {
    pub fn new(identity: Identity) -> Self {
        AuthenticatedSubject(identity)
    }

    pub fn into_inner(self) -> Identity {
        self.0
    }
}

impl Deref for AuthenticatedSubject {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedSubject {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Identity>().cloned() {
            Some(identity) => ready(Ok(AuthenticatedSubject(identity))),
            None => ready(Err(AuthError::Unauthorized)),
        }
    }
}

/// Identity if present, `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct OptionalSubject(Option<Identity>);

impl OptionalSubject {
    pub fn into_inner(self) -> Option<Identity> {
        self.0
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl Deref for OptionalSubject {
    type Target = Option<Identity>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for OptionalSubject {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalSubject(req.extensions().get::<Identity>().cloned())))
    }
}

/// Identity checks directly on `HttpRequest`.
pub trait SecurityExt {
    fn get_identity(&self) -> Option<Identity>;

    fn is_authenticated(&self) -> bool;

    fn has_role(&self, role: &str) -> bool;

    fn has_any_role(&self, roles: &[&str]) -> bool;

    /// True when the identity was restored from a remember-me cookie.
    fn is_remembered(&self) -> bool;
}

impl SecurityExt for HttpRequest {
    fn get_identity(&self) -> Option<Identity> {
        self.extensions().get::<Identity>().cloned()
    }

    fn is_authenticated(&self) -> bool {
        self.extensions().get::<Identity>().is_some()
    }

    fn has_role(&self, role: &str) -> bool {
        self.extensions()
            .get::<Identity>()
            .is_some_and(|i| i.has_role(role))
    }

    fn has_any_role(&self, roles: &[&str]) -> bool {
        self.extensions()
            .get::<Identity>()
            .is_some_and(|i| i.has_any_role(roles))
    }

    fn is_remembered(&self) -> bool {
        self.extensions()
            .get::<Identity>()
            .is_some_and(Identity::is_remembered)
    }
}
