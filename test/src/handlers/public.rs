//! Public routes (login page, login target, logout).

use actix_web::{get, post, HttpResponse, Responder};

use actix_authn::http::security::AuthenticatedSubject;

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Login</title></head>
<body>
<form method="post" action="/login/check">
  <label>Username <input name="username"></label>
  <label>Password <input name="password" type="password"></label>
  <label><input name="remember-me" type="checkbox"> Remember me</label>
  <button type="submit">Sign in</button>
</form>
</body>
</html>
"#;

#[get("/login")]
pub async fn login() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(LOGIN_PAGE)
}

/// Reached when a login succeeds with no pending request to resume.
#[post("/login/check")]
pub async fn login_check(subject: AuthenticatedSubject) -> impl Responder {
    HttpResponse::Ok().body(format!("Logged in as {}", subject.name()))
}

/// The middleware has already cleared storage and the session.
#[get("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::Ok().body("Logged out")
}
