// src/tests/router_tests/category_tests.rs
use std::io::Read;

use astra::Body;
use http::{Method, Request};

use crate::domain::listing::ListingType;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{make_test_app, seed_listing, seed_user};

fn body_string(resp: astra::Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

/// Pull the ?after= cursor out of the rendered "load more" button.
fn extract_cursor(body: &str) -> Option<String> {
    let start = body.find("after=")? + "after=".len();
    let rest = &body[start..];
    let end = rest.find('"').unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

#[test]
fn category_page_lists_only_that_category() {
    let test = make_test_app();
    test.app
        .db
        .with_conn(|conn| {
            let owner = seed_user(conn, "cat@example.com");
            seed_listing(conn, owner, ListingType::Rent, 1000, false);
            seed_listing(conn, owner, ListingType::Sale, 1001, false);
            Ok(())
        })
        .unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/category/rent")
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Places for Rent"));
    assert!(body.contains("/category/rent/"));
    assert!(!body.contains("/category/sale/"));
}

#[test]
fn fifteen_listings_need_exactly_one_load_more() {
    let test = make_test_app();
    test.app
        .db
        .with_conn(|conn| {
            let owner = seed_user(conn, "many@example.com");
            for i in 0..15 {
                seed_listing(conn, owner, ListingType::Rent, 1000 + i, false);
            }
            Ok(())
        })
        .unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/category/rent")
        .body(Body::empty())
        .unwrap();
    let first_body = body_string(handle(req, &test.app).unwrap());

    assert_eq!(first_body.matches("card listing-card").count(), 10);
    let cursor = extract_cursor(&first_body).expect("first page links a cursor");

    // second page, fetched the way htmx would
    let req = Request::builder()
        .method(Method::GET)
        .uri(format!("/category/rent?after={cursor}"))
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap();
    let second_body = body_string(handle(req, &test.app).unwrap());

    assert!(!second_body.contains("<html"));
    assert!(second_body.contains("/category/rent/"));
    assert!(extract_cursor(&second_body).is_none(), "short page ends pagination");

    // no listing repeats across the two pages
    let ids = |body: &str| -> Vec<String> {
        body.match_indices("/category/rent/")
            .map(|(i, _)| {
                let rest = &body[i + "/category/rent/".len()..];
                rest.chars().take_while(|c| c.is_ascii_digit()).collect()
            })
            .collect()
    };
    let mut all = ids(&first_body);
    all.extend(ids(&second_body));
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), total);
    assert_eq!(all.len(), 15);
}

#[test]
fn empty_category_renders_the_empty_state() {
    let test = make_test_app();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/category/sale")
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("No listings here yet"));
}

#[test]
fn unknown_category_is_not_found() {
    let test = make_test_app();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/category/castles")
        .body(Body::empty())
        .unwrap();
    match handle(req, &test.app) {
        Err(ServerError::NotFound) => {}
        other => panic!("expected NotFound, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn tampered_cursor_is_a_bad_request() {
    let test = make_test_app();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/category/rent?after=%21%21%21")
        .body(Body::empty())
        .unwrap();
    match handle(req, &test.app) {
        Err(ServerError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn offers_page_shows_discounted_listings_from_both_categories() {
    let test = make_test_app();
    test.app
        .db
        .with_conn(|conn| {
            let owner = seed_user(conn, "deal@example.com");
            seed_listing(conn, owner, ListingType::Rent, 1000, true);
            seed_listing(conn, owner, ListingType::Sale, 1001, true);
            seed_listing(conn, owner, ListingType::Rent, 1002, false);
            Ok(())
        })
        .unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/offers")
        .body(Body::empty())
        .unwrap();
    let body = body_string(handle(req, &test.app).unwrap());

    assert!(body.contains("Offers"));
    assert_eq!(body.matches("card listing-card").count(), 2);
}

#[test]
fn explore_page_loads_with_recent_strip() {
    let test = make_test_app();
    test.app
        .db
        .with_conn(|conn| {
            let owner = seed_user(conn, "exp@example.com");
            seed_listing(conn, owner, ListingType::Rent, 1000, false);
            Ok(())
        })
        .unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Explore"));
    assert!(body.contains("Places for rent"));
    assert!(body.contains("recent-strip"));
}
