//! HTTP Basic authentication tests.

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;

use common::{basic_auth, body_string, create_http_basic_app, response_cookies, with_cookies};

#[actix_web::test]
async fn test_basic_auth_success() {
    let app = create_http_basic_app().await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("Authorization", basic_auth("alice", "secret")))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "Welcome, alice!");
}

#[actix_web::test]
async fn test_basic_auth_wrong_password() {
    let app = create_http_basic_app().await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("Authorization", basic_auth("alice", "wrong")))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(resp).await, "Invalid credentials.");
}

#[actix_web::test]
async fn test_basic_auth_unknown_user() {
    let app = create_http_basic_app().await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("Authorization", basic_auth("mallory", "password")))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(resp).await, "Invalid credentials.");
}

#[actix_web::test]
async fn test_no_auth_returns_challenge() {
    let app = create_http_basic_app().await;

    let req = test::TestRequest::get().uri("/").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"Restricted\""
    );
}

#[actix_web::test]
async fn test_malformed_header_is_rejected() {
    let app = create_http_basic_app().await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("Authorization", "Basic !!!not-base64"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_public_resource_without_credentials() {
    let app = create_http_basic_app().await;

    let req = test::TestRequest::get().uri("/public/about").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "Hello, guest!");
}

#[actix_web::test]
async fn test_roles_are_attached() {
    let app = create_http_basic_app().await;

    let req = test::TestRequest::get()
        .uri("/me/roles")
        .insert_header(("Authorization", basic_auth("admin", "admin")))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "ADMIN,reader");
}

#[actix_web::test]
async fn test_session_remembers_basic_login() {
    let app = create_http_basic_app().await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("Authorization", basic_auth("alice", "secret")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = response_cookies(&resp);

    // No header this time: the identity comes from the session.
    let req = with_cookies(test::TestRequest::get().uri("/me/roles"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "reader");
}
