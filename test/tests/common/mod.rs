//! Common test utilities and configuration.
//!
//! This module provides shared test infrastructure including:
//! - Test users and roles
//! - Test app builders (form login, HTTP Basic)
//! - Cookie and header helpers

#![allow(dead_code)]

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{get, post, test, web, App, HttpRequest, HttpResponse, Responder};
use base64::prelude::*;

use actix_authn::http::security::{
    AuthenticatedSubject, AuthenticationManager, FormLoginScheme, HttpBasicScheme,
    MemoryAuthenticationProvider, MemoryRoleProvider, OptionalSubject, PatternResourceManager,
    RememberMeConfig, RememberMeStorageProvider, SecurityTransform, SessionConfig,
    SessionStorageProvider,
};

// =============================================================================
// Test Configuration
// =============================================================================

pub const REMEMBER_ME_KEY: &str = "integration-test-remember-me-key";

/// Users:
/// - alice/secret: reader
/// - admin/admin: ADMIN, reader
pub fn test_provider() -> MemoryAuthenticationProvider {
    MemoryAuthenticationProvider::new()
        .with_user("alice", "secret")
        .with_user("admin", "admin")
}

pub fn test_roles() -> MemoryRoleProvider {
    MemoryRoleProvider::new()
        .with_roles("alice", &["reader"])
        .with_roles("admin", &["ADMIN", "reader"])
}

pub fn remember_me_config() -> RememberMeConfig {
    RememberMeConfig::new(REMEMBER_ME_KEY).cookie_secure(false)
}

/// `/login` and `/public/*` are open; everything else needs a login.
pub fn test_resources() -> PatternResourceManager {
    PatternResourceManager::new()
        .permit("^/login$")
        .permit("^/public/")
}

pub fn form_login_manager() -> AuthenticationManager {
    AuthenticationManager::builder()
        .scheme(FormLoginScheme::default())
        .provider(test_provider())
        .role_provider(test_roles())
        .storage_provider(SessionStorageProvider::new(SessionConfig::new()))
        .storage_provider(RememberMeStorageProvider::new(remember_me_config()))
        .resource_manager(test_resources())
        .build()
        .unwrap()
}

pub fn http_basic_manager() -> AuthenticationManager {
    AuthenticationManager::builder()
        .scheme(HttpBasicScheme::default())
        .provider(test_provider())
        .role_provider(test_roles())
        .storage_provider(SessionStorageProvider::default())
        .resource_manager(test_resources())
        .build()
        .unwrap()
}

pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7u8; 64][..]))
        .cookie_secure(false)
        .build()
}

/// Helper function to create Basic Auth header value.
pub fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    format!("Basic {}", BASE64_STANDARD.encode(credentials))
}

/// Cookies set by a response, to send back with the next request.
pub fn response_cookies<B>(resp: &ServiceResponse<B>) -> Vec<Cookie<'static>> {
    resp.response()
        .cookies()
        .map(|c| c.into_owned())
        .collect()
}

pub fn find_cookie<'a>(cookies: &'a [Cookie<'static>], name: &str) -> Option<&'a Cookie<'static>> {
    cookies.iter().find(|c| c.name() == name)
}

/// Adds every cookie to the request.
pub fn with_cookies(mut req: test::TestRequest, cookies: &[Cookie<'static>]) -> test::TestRequest {
    for cookie in cookies {
        req = req.cookie(cookie.clone());
    }
    req
}

pub fn location<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn body_string(resp: ServiceResponse) -> String {
    let body = test::read_body(resp).await;
    String::from_utf8_lossy(&body).into_owned()
}

// =============================================================================
// Test Handlers
// =============================================================================

#[get("/")]
pub async fn index(subject: AuthenticatedSubject) -> impl Responder {
    HttpResponse::Ok().body(format!("Welcome, {}!", subject.name()))
}

#[get("/login")]
pub async fn login() -> impl Responder {
    HttpResponse::Ok().body("Login page")
}

#[post("/login/check")]
pub async fn login_check(subject: AuthenticatedSubject) -> impl Responder {
    HttpResponse::Ok().body(format!("Logged in as {}", subject.name()))
}

/// Registered for every method: a forward keeps the login request's method.
pub async fn reports(req: HttpRequest, subject: AuthenticatedSubject) -> impl Responder {
    HttpResponse::Ok().body(format!(
        "Reports for {} [{} {}]",
        subject.name(),
        req.method(),
        req.query_string()
    ))
}

#[get("/index.html")]
pub async fn dev_index(subject: AuthenticatedSubject) -> impl Responder {
    HttpResponse::Ok().body(format!("Index for {}", subject.name()))
}

#[get("/me/roles")]
pub async fn my_roles(subject: AuthenticatedSubject) -> impl Responder {
    HttpResponse::Ok().body(subject.role_names().join(","))
}

#[get("/public/about")]
pub async fn about(subject: OptionalSubject) -> impl Responder {
    match subject.into_inner() {
        Some(identity) => HttpResponse::Ok().body(format!("Hello, {}!", identity.name())),
        None => HttpResponse::Ok().body("Hello, guest!"),
    }
}

#[get("/logout")]
pub async fn logout(subject: OptionalSubject) -> impl Responder {
    HttpResponse::Ok().body(format!("Logged out (anonymous: {})", !subject.is_authenticated()))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(login)
        .service(login_check)
        .service(web::resource("/reports").to(reports))
        .service(dev_index)
        .service(my_roles)
        .service(about)
        .service(logout);
}

// =============================================================================
// Test Apps
// =============================================================================

/// Form login with session and remember-me storage.
pub async fn create_form_login_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new().wrap(session_middleware()).service(
            web::scope("")
                .wrap(SecurityTransform::new(form_login_manager()).logout_url("/logout"))
                .configure(routes),
        ),
    )
    .await
}

/// HTTP Basic with session storage.
pub async fn create_http_basic_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new().wrap(session_middleware()).service(
            web::scope("")
                .wrap(SecurityTransform::new(http_basic_manager()).logout_url("/logout"))
                .configure(routes),
        ),
    )
    .await
}
