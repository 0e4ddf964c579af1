// src/tests/router_tests/profile_tests.rs
use std::io::Read;

use astra::Body;
use http::{Method, Request};

use crate::domain::listing::ListingType;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{make_test_app, seed_listing, sign_up_user};

fn body_string(resp: astra::Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

#[test]
fn profile_redirects_to_sign_in_when_unauthenticated() {
    let test = make_test_app();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/profile")
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &test.app).unwrap();

    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or(""),
        "/sign-in"
    );
}

#[test]
fn profile_renders_details_and_own_listings_when_authenticated() {
    let test = make_test_app();
    let (user_id, token) = sign_up_user(&test.app, "me@example.com");
    test.app
        .db
        .with_conn(|conn| {
            seed_listing(conn, user_id, ListingType::Sale, 1000, false);
            Ok(())
        })
        .unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/profile")
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("me@example.com"));
    assert!(body.contains("My Profile"));
    assert!(body.contains("Seeded test listing"));
    assert!(body.contains("Delete"));
    assert!(body.contains("/edit-listing/"));
}

#[test]
fn profile_ignores_other_peoples_listings() {
    let test = make_test_app();
    let (other_id, _other_token) = sign_up_user(&test.app, "other@example.com");
    let (_user_id, token) = sign_up_user(&test.app, "mine@example.com");

    test.app
        .db
        .with_conn(|conn| {
            seed_listing(conn, other_id, ListingType::Rent, 1000, false);
            Ok(())
        })
        .unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/profile")
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let body = body_string(handle(req, &test.app).unwrap());
    assert!(body.contains("You have no listings yet"));
}

#[test]
fn display_name_change_persists() {
    let test = make_test_app();
    let (user_id, token) = sign_up_user(&test.app, "rename@example.com");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/profile/details")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Cookie", format!("session={token}"))
        .body(Body::from(b"name=Brand+New+Name".to_vec()))
        .unwrap();
    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 302);

    let name: String = test
        .app
        .db
        .with_conn(|conn| {
            conn.query_row(
                "select name from users where id = ?",
                rusqlite::params![user_id],
                |r| r.get(0),
            )
            .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap();
    assert_eq!(name, "Brand New Name");
}

#[test]
fn empty_display_name_is_rejected() {
    let test = make_test_app();
    let (_user_id, token) = sign_up_user(&test.app, "keep@example.com");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/profile/details")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Cookie", format!("session={token}"))
        .body(Body::from(b"name=+".to_vec()))
        .unwrap();
    match handle(req, &test.app) {
        Err(ServerError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}
