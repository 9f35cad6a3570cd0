//! Request context consumed by the authentication manager.
//!
//! # Overview
//! [`AuthContext`] is the only view of the transport the manager and its
//! collaborators get: request data (session, URI, headers, parameters,
//! cookies) and a small set of response side effects (redirect, challenge,
//! cookies, forward).
//!
//! [`HttpAuthContext`] implements it over an Actix `ServiceRequest`. Side
//! effects are recorded in a [`ResponseParts`] and materialised by the
//! middleware once the manager returns.
//!
//! # Forwarding
//! A forward carries the identity with it. The forwarded request receives
//! that identity in its extensions; nothing is published process-wide.

use std::cell::RefCell;
use std::collections::HashMap;

use actix_session::{Session, SessionExt};
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceRequest;
use actix_web::http::header::{HeaderName, HeaderValue, LOCATION};
use actix_web::http::{StatusCode, Uri};
use actix_web::{HttpResponse, HttpResponseBuilder};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

use crate::http::error::AuthError;
use crate::http::security::identity::Identity;

/// Session key holding the generated session id.
pub const SESSION_ID_KEY: &str = "security_session_id";

/// What the authentication core may read from, and do to, the current
/// request.
pub trait AuthContext {
    /// Identifier of the current session, created on first use.
    fn session_id(&self) -> String;

    /// Request path, including the context path.
    fn request_uri(&self) -> &str;

    /// Raw query string, empty when absent.
    fn query_string(&self) -> &str;

    /// Prefix under which the application is mounted, empty at root.
    fn context_path(&self) -> &str;

    /// Resource handed to the resource manager: the request path relative
    /// to the context path, like every other configured URL.
    fn resource(&self) -> &str {
        relative_path(self.request_uri(), self.context_path())
    }

    fn method(&self) -> &str;

    fn header(&self, name: &str) -> Option<String>;

    /// Request parameter, looked up in the urlencoded body then the query.
    fn parameter(&self, name: &str) -> Option<String>;

    fn cookie(&self, name: &str) -> Option<String>;

    fn session_attribute(&self, key: &str) -> Option<String>;

    fn set_session_attribute(&self, key: &str, value: String) -> Result<(), AuthError>;

    fn remove_session_attribute(&self, key: &str);

    fn invalidate_session(&self);

    /// True once a full response (redirect or status) has been chosen.
    fn is_committed(&self) -> bool;

    /// Commits a `302 Found` to `location`.
    fn send_redirect(&self, location: &str) -> Result<(), AuthError>;

    /// Commits a bare status response, typically a `401` challenge.
    fn send_status(&self, status: StatusCode);

    fn add_header(&self, name: &str, value: &str);

    fn add_cookie(&self, cookie: Cookie<'static>);

    /// Dispatches the request to `path` inside the same process, carrying
    /// `identity` along.
    fn forward(&self, path: &str, identity: &Identity) -> Result<(), AuthError>;
}

/// A recorded forward: target path and the identity it continues with.
#[derive(Debug, Clone)]
pub struct Forward {
    pub path: String,
    pub identity: Identity,
}

/// `path` with the `context_path` prefix removed; unchanged when the path
/// lies outside the context path.
pub fn relative_path<'a>(path: &'a str, context_path: &str) -> &'a str {
    if context_path.is_empty() {
        return path;
    }
    match path.strip_prefix(context_path) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Response side effects recorded during authentication.
#[derive(Debug, Default)]
pub struct ResponseParts {
    status: Option<StatusCode>,
    location: Option<String>,
    headers: Vec<(HeaderName, HeaderValue)>,
    cookies: Vec<Cookie<'static>>,
    forward: Option<Forward>,
}

impl ResponseParts {
    pub fn is_committed(&self) -> bool {
        self.status.is_some() || self.location.is_some()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn forward(&self) -> Option<&Forward> {
        self.forward.as_ref()
    }

    pub fn take_forward(&mut self) -> Option<Forward> {
        self.forward.take()
    }

    pub fn cookies(&self) -> &[Cookie<'static>] {
        &self.cookies
    }

    /// The committed response, if a redirect or status was chosen.
    pub fn committed_response(&self) -> Option<HttpResponse> {
        let mut builder = match (&self.location, self.status) {
            (Some(location), _) => {
                let mut builder = HttpResponseBuilder::new(StatusCode::FOUND);
                builder.insert_header((LOCATION, location.as_str()));
                builder
            }
            (None, Some(status)) => HttpResponseBuilder::new(status),
            (None, None) => return None,
        };
        for (name, value) in &self.headers {
            builder.append_header((name.clone(), value.clone()));
        }
        for cookie in &self.cookies {
            builder.cookie(cookie.clone());
        }
        Some(builder.finish())
    }

    /// Copies recorded headers and cookies onto a response produced
    /// downstream.
    pub fn apply_to<B>(&self, res: &mut HttpResponse<B>) {
        for (name, value) in &self.headers {
            res.headers_mut().append(name.clone(), value.clone());
        }
        for cookie in &self.cookies {
            if let Err(e) = res.add_cookie(cookie) {
                tracing::warn!(cookie = cookie.name(), error = %e, "dropping invalid cookie");
            }
        }
    }
}

/// [`AuthContext`] over an Actix `ServiceRequest`.
///
/// Requires `SessionMiddleware` to persist the session between requests;
/// without it the session only lives for the current request.
pub struct HttpAuthContext<'a> {
    req: &'a ServiceRequest,
    session: Session,
    context_path: String,
    form: HashMap<String, String>,
    query: HashMap<String, String>,
    response: RefCell<ResponseParts>,
}

impl<'a> HttpAuthContext<'a> {
    pub fn new(req: &'a ServiceRequest, context_path: &str) -> Self {
        let query = url::form_urlencoded::parse(req.query_string().as_bytes())
            .into_owned()
            .collect();

        HttpAuthContext {
            req,
            session: req.get_session(),
            context_path: context_path.to_string(),
            form: HashMap::new(),
            query,
            response: RefCell::new(ResponseParts::default()),
        }
    }

    /// Sets the parameters parsed from an urlencoded request body.
    pub fn with_form(mut self, form: HashMap<String, String>) -> Self {
        self.form = form;
        self
    }

    /// Consumes the context, returning the recorded side effects.
    pub fn into_response_parts(self) -> ResponseParts {
        self.response.into_inner()
    }
}

impl AuthContext for HttpAuthContext<'_> {
    fn session_id(&self) -> String {
        if let Some(id) = self.session.get::<String>(SESSION_ID_KEY).ok().flatten() {
            return id;
        }

        let id: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(30)
            .map(char::from)
            .collect();
        if let Err(e) = self.session.insert(SESSION_ID_KEY, &id) {
            tracing::warn!(error = %e, "unable to persist session id");
        }
        id
    }

    fn request_uri(&self) -> &str {
        self.req.path()
    }

    fn query_string(&self) -> &str {
        self.req.query_string()
    }

    fn context_path(&self) -> &str {
        &self.context_path
    }

    fn method(&self) -> &str {
        self.req.method().as_str()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.req
            .headers()
            .get(name)?
            .to_str()
            .ok()
            .map(str::to_string)
    }

    fn parameter(&self, name: &str) -> Option<String> {
        self.form
            .get(name)
            .or_else(|| self.query.get(name))
            .cloned()
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.req.cookie(name).map(|c| c.value().to_string())
    }

    fn session_attribute(&self, key: &str) -> Option<String> {
        self.session.get::<String>(key).ok().flatten()
    }

    fn set_session_attribute(&self, key: &str, value: String) -> Result<(), AuthError> {
        self.session
            .insert(key, value)
            .map_err(|e| AuthError::storage(e.to_string()))
    }

    fn remove_session_attribute(&self, key: &str) {
        self.session.remove(key);
    }

    fn invalidate_session(&self) {
        self.session.purge();
    }

    fn is_committed(&self) -> bool {
        self.response.borrow().is_committed()
    }

    fn send_redirect(&self, location: &str) -> Result<(), AuthError> {
        HeaderValue::from_str(location)
            .map_err(|e| AuthError::navigation(format!("invalid location {location:?}: {e}")))?;
        self.response.borrow_mut().location = Some(location.to_string());
        Ok(())
    }

    fn send_status(&self, status: StatusCode) {
        self.response.borrow_mut().status = Some(status);
    }

    fn add_header(&self, name: &str, value: &str) {
        match (
            HeaderName::try_from(name),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => self.response.borrow_mut().headers.push((name, value)),
            _ => tracing::warn!(header = name, "dropping invalid response header"),
        }
    }

    fn add_cookie(&self, cookie: Cookie<'static>) {
        self.response.borrow_mut().cookies.push(cookie);
    }

    fn forward(&self, path: &str, identity: &Identity) -> Result<(), AuthError> {
        if !path.starts_with('/') {
            return Err(AuthError::navigation(format!(
                "forward target {path:?} is not an absolute path"
            )));
        }
        path.parse::<Uri>()
            .map_err(|e| AuthError::navigation(format!("invalid forward target {path:?}: {e}")))?;

        self.response.borrow_mut().forward = Some(Forward {
            path: path.to_string(),
            identity: identity.clone(),
        });
        Ok(())
    }
}
