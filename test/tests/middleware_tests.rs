//! Middleware tests: request bodies and logout wiring.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse, Responder};

use actix_authn::http::security::{OptionalSubject, SecurityTransform};
use common::{body_string, create_form_login_app, form_login_manager, session_middleware};

async fn echo(form: web::Form<Vec<(String, String)>>, subject: OptionalSubject) -> impl Responder {
    let pairs: Vec<String> = form
        .into_inner()
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    HttpResponse::Ok().body(format!(
        "{} ({})",
        pairs.join("&"),
        if subject.is_authenticated() { "user" } else { "guest" }
    ))
}

#[actix_web::test]
async fn test_form_body_still_reaches_handler() {
    let app = test::init_service(
        App::new().wrap(session_middleware()).service(
            web::scope("")
                .wrap(SecurityTransform::new(form_login_manager()))
                .route("/public/echo", web::post().to(echo)),
        ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/public/echo")
        .set_form([("username", "alice"), ("note", "a&b")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "username=alice&note=a&b (guest)");
}

#[actix_web::test]
async fn test_oversized_form_is_rejected() {
    let app = test::init_service(
        App::new().wrap(session_middleware()).service(
            web::scope("")
                .wrap(SecurityTransform::new(form_login_manager()).max_form_size(16))
                .route("/public/echo", web::post().to(echo)),
        ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/public/echo")
        .set_form([("username", "alice"), ("password", "a-rather-long-password")])
        .to_request();
    let err = test::try_call_service(&app, req).await.err().unwrap();

    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::PAYLOAD_TOO_LARGE
    );
}

#[actix_web::test]
async fn test_json_login_submission_is_not_read_as_credentials() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::post()
        .uri("/login/check")
        .set_json(serde_json::json!({"username": "alice", "password": "secret"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_credentials_in_query_string_are_accepted() {
    let app = create_form_login_app().await;

    let req = test::TestRequest::post()
        .uri("/login/check?username=alice&password=secret")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "Logged in as alice");
}
