// src/tests/router_tests/auth_tests.rs
use std::io::Read;

use astra::Body;
use http::{Method, Request};

use crate::auth::reset::{ResetConfig, ResetService};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::make_test_app;
use crate::util::now_unix;

fn body_string(resp: astra::Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

fn header<'a>(resp: &'a astra::Response, name: &str) -> &'a str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[test]
fn sign_in_page_loads_successfully() {
    let test = make_test_app();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/sign-in")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &test.app).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign In"));
    assert!(body.contains("form"));
    // no Google button without configuration
    assert!(!body.contains("/oauth/google"));
}

#[test]
fn sign_up_creates_account_session_and_redirects_home() {
    let test = make_test_app();

    let form = "name=Jane+Doe&email=Jane%40Example.com&password=secret1";
    let req = Request::builder()
        .method(Method::POST)
        .uri("/sign-up")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.as_bytes().to_vec()))
        .unwrap();

    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/");

    let cookie = header(&resp, "Set-Cookie").to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    // email landed normalized
    let email: String = test
        .app
        .db
        .with_conn(|conn| {
            conn.query_row("select email from users", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap();
    assert_eq!(email, "jane@example.com");
}

#[test]
fn duplicate_sign_up_is_rejected() {
    let test = make_test_app();

    let form = "name=Jane&email=jane%40example.com&password=secret1";
    let first = Request::builder()
        .method(Method::POST)
        .uri("/sign-up")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.as_bytes().to_vec()))
        .unwrap();
    handle(first, &test.app).unwrap();

    let second = Request::builder()
        .method(Method::POST)
        .uri("/sign-up")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.as_bytes().to_vec()))
        .unwrap();
    match handle(second, &test.app) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("already exists")),
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn sign_in_round_trip_then_wrong_password_fails() {
    let test = make_test_app();

    let form = "name=Jane&email=jane%40example.com&password=secret1";
    let req = Request::builder()
        .method(Method::POST)
        .uri("/sign-up")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.as_bytes().to_vec()))
        .unwrap();
    handle(req, &test.app).unwrap();

    let good = Request::builder()
        .method(Method::POST)
        .uri("/sign-in")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(b"email=jane%40example.com&password=secret1".to_vec()))
        .unwrap();
    let resp = handle(good, &test.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert!(header(&resp, "Set-Cookie").starts_with("session="));

    let bad = Request::builder()
        .method(Method::POST)
        .uri("/sign-in")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(b"email=jane%40example.com&password=wrongpw".to_vec()))
        .unwrap();
    match handle(bad, &test.app) {
        Err(ServerError::Unauthorized(msg)) => assert!(msg.contains("wrong email or password")),
        other => panic!("expected Unauthorized, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn sign_out_revokes_the_session() {
    let test = make_test_app();
    let (_user_id, token) = crate::tests::utils::sign_up_user(&test.app, "out@example.com");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/sign-out")
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/");
    assert!(header(&resp, "Set-Cookie").contains("Max-Age=0"));

    // the old cookie no longer authenticates
    let profile = Request::builder()
        .method(Method::GET)
        .uri("/profile")
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let resp = handle(profile, &test.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/sign-in");
}

#[test]
fn forgot_password_returns_partial_html_for_htmx() {
    let test = make_test_app();
    let email = "reset@example.com";
    crate::tests::utils::sign_up_user(&test.app, email);

    let body_data = format!("email={}", email.replace('@', "%40"));
    let req = Request::builder()
        .method(Method::POST)
        .uri("/forgot-password")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("HX-Request", "true")
        .body(Body::from(body_data.as_bytes().to_vec()))
        .unwrap();

    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Check your email"));
    assert!(body.contains(email));

    // partial only, crucial for the htmx swap
    assert!(!body.contains("<!DOCTYPE html>"));
    assert!(!body.contains("<html"));
}

#[test]
fn forgot_password_answer_is_identical_for_unknown_accounts() {
    let test = make_test_app();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/forgot-password")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("HX-Request", "true")
        .body(Body::from(b"email=ghost%40example.com".to_vec()))
        .unwrap();

    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Check your email"));
}

#[test]
fn reset_password_link_signs_the_user_back_in() {
    let test = make_test_app();
    let email = "back@example.com";
    crate::tests::utils::sign_up_user(&test.app, email);

    // issue a link straight through the service to get at the raw token
    let issued = test
        .app
        .db
        .with_conn(|conn| {
            ResetService::new(ResetConfig::default()).request_reset(conn, email, now_unix())
        })
        .unwrap()
        .expect("account exists");

    let form_req = Request::builder()
        .method(Method::GET)
        .uri(format!("/reset-password?token={}", issued.token))
        .body(Body::empty())
        .unwrap();
    let resp = handle(form_req, &test.app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("new password"));

    let submit = Request::builder()
        .method(Method::POST)
        .uri("/reset-password")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(
            format!("token={}&password=freshpass", issued.token).into_bytes(),
        ))
        .unwrap();
    let resp = handle(submit, &test.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert!(header(&resp, "Set-Cookie").starts_with("session="));

    // the link is single-use
    let again = Request::builder()
        .method(Method::POST)
        .uri("/reset-password")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(
            format!("token={}&password=otherpass", issued.token).into_bytes(),
        ))
        .unwrap();
    assert!(handle(again, &test.app).is_err());
}
