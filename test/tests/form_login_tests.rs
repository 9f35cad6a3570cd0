//! Form login tests: challenge, login, and resuming the original request.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{body_string, create_form_login_app, location, response_cookies, with_cookies};

fn login_form(username: &'static str, password: &'static str) -> [(&'static str, &'static str); 2] {
    [("username", username), ("password", password)]
}

#[actix_web::test]
async fn test_protected_resource_redirects_to_login() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::get().uri("/reports").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp).as_deref(), Some("/login"));
}

#[actix_web::test]
async fn test_login_page_is_public() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::get().uri("/login").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "Login page");
}

#[actix_web::test]
async fn test_login_forwards_to_original_request() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::get()
        .uri("/reports?year=2024")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let session = response_cookies(&resp);

    let req = with_cookies(test::TestRequest::post().uri("/login/check"), &session)
        .set_form(login_form("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Served in place: no redirect, the login request's method is kept.
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "Reports for alice [POST year=2024]");
}

#[actix_web::test]
async fn test_original_request_is_resumed_only_once() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::get().uri("/reports").to_request();
    let resp = test::call_service(&app, req).await;
    let session = response_cookies(&resp);

    let req = with_cookies(test::TestRequest::post().uri("/login/check"), &session)
        .set_form(login_form("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(body_string(resp).await.starts_with("Reports for alice"));

    // Same pre-login session again: the pending entry is gone.
    let req = with_cookies(test::TestRequest::post().uri("/login/check"), &session)
        .set_form(login_form("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "Logged in as alice");
}

#[actix_web::test]
async fn test_login_without_pending_request_reaches_handler() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::post()
        .uri("/login/check")
        .set_form(login_form("admin", "admin"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "Logged in as admin");
}

#[actix_web::test]
async fn test_session_keeps_identity_after_login() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::post()
        .uri("/login/check")
        .set_form(login_form("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let session = response_cookies(&resp);

    let req = with_cookies(test::TestRequest::get().uri("/me/roles"), &session).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "reader");
}

#[actix_web::test]
async fn test_wrong_password_is_unauthorized() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::post()
        .uri("/login/check")
        .set_form(login_form("alice", "wrong"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(resp).await, "Invalid credentials.");
}

#[actix_web::test]
async fn test_unknown_user_is_indistinguishable_from_wrong_password() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::post()
        .uri("/login/check")
        .set_form(login_form("mallory", "secret"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(resp).await, "Invalid credentials.");
}

#[actix_web::test]
async fn test_failed_login_keeps_pending_request() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::get().uri("/reports?page=3").to_request();
    let resp = test::call_service(&app, req).await;
    let session = response_cookies(&resp);

    let req = with_cookies(test::TestRequest::post().uri("/login/check"), &session)
        .set_form(login_form("alice", "wrong"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = with_cookies(test::TestRequest::post().uri("/login/check"), &session)
        .set_form(login_form("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(body_string(resp).await, "Reports for alice [POST page=3]");
}

#[actix_web::test]
async fn test_public_resource_sees_logged_in_user() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::post()
        .uri("/login/check")
        .set_form(login_form("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let session = response_cookies(&resp);

    let req = with_cookies(test::TestRequest::get().uri("/public/about"), &session).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(body_string(resp).await, "Hello, alice!");
}
