//! Authentication middleware for Actix Web.
//!
//! Runs the [`AuthenticationManager`] once per request and turns its outcome
//! into an actix response:
//!
//! - an identity is inserted into the request extensions for the
//!   [extractors](crate::http::security::extractor);
//! - a committed redirect or challenge short-circuits the handler;
//! - a forward rewrites the request URI in place, so the original target is
//!   served by this same request with the fresh identity attached;
//! - cookies recorded by storage providers are added to the final response.
//!
//! `SessionMiddleware` must wrap this middleware (be registered after it)
//! so the session is available.

use std::collections::HashMap;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::error::PayloadError;
use actix_web::http::Uri;
use actix_web::web::{Bytes, BytesMut};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::{ok, ready, LocalBoxFuture, Ready};
use futures_util::{stream, Stream, StreamExt};

use crate::http::error::AuthError;
use crate::http::security::context::{relative_path, HttpAuthContext};
use crate::http::security::manager::AuthenticationManager;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Authentication middleware factory.
///
/// # Example
/// ```ignore
/// let manager = Arc::new(manager);
///
/// HttpServer::new(move || {
///     App::new()
///         .wrap(
///             SecurityTransform::shared(Arc::clone(&manager))
///                 .logout_url("/logout"),
///         )
///         .wrap(SessionMiddleware::new(CookieSessionStore::default(), key.clone()))
/// })
/// ```
pub struct SecurityTransform {
    manager: Arc<AuthenticationManager>,
    context_path: String,
    logout_url: Option<String>,
    max_form_size: usize,
}

impl SecurityTransform {
    pub fn new(manager: AuthenticationManager) -> Self {
        Self::shared(Arc::new(manager))
    }

    /// Uses a manager shared with other workers, so they see one
    /// pending-request cache.
    pub fn shared(manager: Arc<AuthenticationManager>) -> Self {
        SecurityTransform {
            manager,
            context_path: String::new(),
            logout_url: None,
            max_form_size: 16 * 1024,
        }
    }

    /// Prefix the application is mounted under (default: empty).
    pub fn context_path(mut self, path: &str) -> Self {
        self.context_path = path.trim_end_matches('/').to_string();
        self
    }

    /// Path, relative to the context path, that logs the current session out
    /// before reaching its handler.
    pub fn logout_url(mut self, url: &str) -> Self {
        self.logout_url = Some(url.to_string());
        self
    }

    /// Largest urlencoded body read for credential parameters (default 16 KiB).
    pub fn max_form_size(mut self, limit: usize) -> Self {
        self.max_form_size = limit;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityTransform
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecurityService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityService {
            manager: Arc::clone(&self.manager),
            settings: Rc::new(Settings {
                context_path: self.context_path.clone(),
                logout_url: self.logout_url.clone(),
                max_form_size: self.max_form_size,
            }),
            service: Rc::new(service),
        })
    }
}

struct Settings {
    context_path: String,
    logout_url: Option<String>,
    max_form_size: usize,
}

/// Authentication middleware service.
pub struct SecurityService<S> {
    manager: Arc<AuthenticationManager>,
    settings: Rc<Settings>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SecurityService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let manager = Arc::clone(&self.manager);
        let settings = Rc::clone(&self.settings);

        Box::pin(async move {
            let form = read_form(&mut req, settings.max_form_size).await?;

            let is_logout = settings
                .logout_url
                .as_deref()
                .is_some_and(|url| relative_path(req.path(), &settings.context_path) == url);

            let (result, mut parts) = {
                let ctx = HttpAuthContext::new(&req, &settings.context_path).with_form(form);
                let result = if is_logout {
                    manager.logout(&ctx).map(|_| None)
                } else {
                    manager.authenticate(&ctx)
                };
                (result, ctx.into_response_parts())
            };

            match result {
                Ok(identity) => {
                    if let Some(forward) = parts.take_forward() {
                        let target = format!("{}{}", settings.context_path, forward.path);
                        if let Err(e) = rewrite_uri(&mut req, &target) {
                            let mut res = e.error_response();
                            parts.apply_to(&mut res);
                            return Ok(req.into_response(res).map_into_right_body());
                        }
                        tracing::debug!(path = %target, "forwarding to original request");
                        req.extensions_mut().insert(forward.identity);
                    } else if let Some(res) = parts.committed_response() {
                        return Ok(req.into_response(res).map_into_right_body());
                    } else if let Some(identity) = identity {
                        req.extensions_mut().insert(identity);
                    }

                    let mut res = service.call(req).await?;
                    parts.apply_to(res.response_mut());
                    Ok(res.map_into_left_body())
                }
                Err(AuthError::InvalidCredentials) => {
                    let res = parts.committed_response().unwrap_or_else(|| {
                        let mut res = AuthError::InvalidCredentials.error_response();
                        parts.apply_to(&mut res);
                        res
                    });
                    Ok(req.into_response(res).map_into_right_body())
                }
                Err(e) => {
                    tracing::warn!(error = %e, "authentication aborted");
                    let mut res = e.error_response();
                    parts.apply_to(&mut res);
                    Ok(req.into_response(res).map_into_right_body())
                }
            }
        })
    }
}

/// Buffers an urlencoded body, parses it and puts the bytes back for the
/// handler.
async fn read_form(
    req: &mut ServiceRequest,
    limit: usize,
) -> Result<HashMap<String, String>, Error> {
    if req.content_type() != FORM_CONTENT_TYPE {
        return Ok(HashMap::new());
    }

    let mut payload = req.take_payload();
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > limit {
            return Err(PayloadError::Overflow.into());
        }
        body.extend_from_slice(&chunk);
    }
    let body = body.freeze();

    let form = url::form_urlencoded::parse(&body).into_owned().collect();
    let replay: Pin<Box<dyn Stream<Item = Result<Bytes, PayloadError>>>> =
        Box::pin(stream::once(ready(Ok(body))));
    req.set_payload(Payload::Stream { payload: replay });
    Ok(form)
}

/// Points the request at `target`, keeping method, headers and body.
fn rewrite_uri(req: &mut ServiceRequest, target: &str) -> Result<(), AuthError> {
    let uri: Uri = target
        .parse()
        .map_err(|e| AuthError::navigation(format!("invalid forward target {target:?}: {e}")))?;
    req.match_info_mut().get_mut().update(&uri);
    req.head_mut().uri = uri;
    Ok(())
}
