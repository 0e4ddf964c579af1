// src/tests/router_tests/listing_tests.rs
use std::io::Read;

use astra::Body;
use http::{Method, Request};

use crate::domain::listing::ListingType;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    listing_form_fields, make_test_app, multipart_body, multipart_content_type, seed_listing,
    sign_up_user,
};

fn body_string(resp: astra::Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

fn location(resp: &astra::Response) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

#[test]
fn create_listing_via_multipart_form_round_trips() {
    let test = make_test_app();
    let (user_id, token) = sign_up_user(&test.app, "creator@example.com");

    let body = multipart_body(&listing_form_fields(), &[("front.jpg", b"fakejpegbytes")]);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/create-listing")
        .header("Content-Type", multipart_content_type())
        .header("Cookie", format!("session={token}"))
        .body(Body::from(body))
        .unwrap();

    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 302);
    let loc = location(&resp);
    assert!(loc.starts_with("/category/rent/"), "got location: {loc}");

    // the detail page renders what was submitted
    let detail = Request::builder()
        .method(Method::GET)
        .uri(loc.as_str())
        .body(Body::empty())
        .unwrap();
    let detail_body = body_string(handle(detail, &test.app).unwrap());
    assert!(detail_body.contains("Bright garden apartment"));
    assert!(detail_body.contains("$1,200"));
    assert!(detail_body.contains("/uploads/"));

    // the image file actually landed in the store
    let owner_check: i64 = test
        .app
        .db
        .with_conn(|conn| {
            conn.query_row("select owner_id from listings", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap();
    assert_eq!(owner_check, user_id);
    assert_eq!(
        std::fs::read_dir(test.app.images.root()).unwrap().count(),
        1
    );
}

#[test]
fn create_listing_requires_a_session() {
    let test = make_test_app();

    let body = multipart_body(&listing_form_fields(), &[("front.jpg", b"bytes")]);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/create-listing")
        .header("Content-Type", multipart_content_type())
        .body(Body::from(body))
        .unwrap();

    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/sign-in");

    // and nothing was written
    let count: i64 = test
        .app
        .db
        .with_conn(|conn| {
            conn.query_row("select count(*) from listings", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn price_ordering_violation_is_rejected_with_no_write() {
    let test = make_test_app();
    let (_user_id, token) = sign_up_user(&test.app, "pricer@example.com");

    let mut fields = listing_form_fields();
    fields.insert("offer".into(), "true".into());
    fields.insert("regular_price".into(), "1000".into());
    fields.insert("discounted_price".into(), "1200".into());

    let body = multipart_body(&fields, &[("front.jpg", b"bytes")]);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/create-listing")
        .header("Content-Type", multipart_content_type())
        .header("Cookie", format!("session={token}"))
        .body(Body::from(body))
        .unwrap();

    match handle(req, &test.app) {
        Err(ServerError::BadRequest(msg)) => {
            assert!(msg.contains("less than regular price"), "got: {msg}")
        }
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }

    let count: i64 = test
        .app
        .db
        .with_conn(|conn| {
            conn.query_row("select count(*) from listings", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(
        std::fs::read_dir(test.app.images.root()).unwrap().count(),
        0
    );
}

#[test]
fn seventh_image_is_rejected_before_any_upload() {
    let test = make_test_app();
    let (_user_id, token) = sign_up_user(&test.app, "imgs@example.com");

    let images: Vec<(&str, &[u8])> = vec![
        ("1.jpg", b"x" as &[u8]),
        ("2.jpg", b"x"),
        ("3.jpg", b"x"),
        ("4.jpg", b"x"),
        ("5.jpg", b"x"),
        ("6.jpg", b"x"),
        ("7.jpg", b"x"),
    ];
    let body = multipart_body(&listing_form_fields(), &images);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/create-listing")
        .header("Content-Type", multipart_content_type())
        .header("Cookie", format!("session={token}"))
        .body(Body::from(body))
        .unwrap();

    match handle(req, &test.app) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("max 6 images")),
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
    assert_eq!(
        std::fs::read_dir(test.app.images.root()).unwrap().count(),
        0
    );
}

#[test]
fn edit_listing_updates_fields_for_the_owner() {
    let test = make_test_app();
    let (user_id, token) = sign_up_user(&test.app, "editor@example.com");
    let listing_id = test
        .app
        .db
        .with_conn(|conn| Ok(seed_listing(conn, user_id, ListingType::Rent, 1000, false)))
        .unwrap();

    let mut fields = listing_form_fields();
    fields.insert("name".into(), "Freshly renamed place".into());

    let body = multipart_body(&fields, &[]);
    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("/edit-listing/{listing_id}"))
        .header("Content-Type", multipart_content_type())
        .header("Cookie", format!("session={token}"))
        .body(Body::from(body))
        .unwrap();

    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 302);

    let listing = crate::marketplace::query::get_listing(&test.app.db, listing_id)
        .unwrap()
        .unwrap();
    assert_eq!(listing.name, "Freshly renamed place");
    // no new files were submitted, images stay
    assert_eq!(listing.image_urls.len(), 1);
}

#[test]
fn edit_listing_is_denied_for_strangers() {
    let test = make_test_app();
    let (owner_id, _owner_token) = sign_up_user(&test.app, "owner@example.com");
    let (_stranger_id, stranger_token) = sign_up_user(&test.app, "stranger@example.com");
    let listing_id = test
        .app
        .db
        .with_conn(|conn| Ok(seed_listing(conn, owner_id, ListingType::Rent, 1000, false)))
        .unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri(format!("/edit-listing/{listing_id}"))
        .header("Cookie", format!("session={stranger_token}"))
        .body(Body::empty())
        .unwrap();

    match handle(req, &test.app) {
        Err(ServerError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn delete_removes_listing_from_store_and_list() {
    let test = make_test_app();
    let (user_id, token) = sign_up_user(&test.app, "deleter@example.com");
    let listing_id = test
        .app
        .db
        .with_conn(|conn| Ok(seed_listing(conn, user_id, ListingType::Rent, 1000, false)))
        .unwrap();

    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("/listings/{listing_id}/delete"))
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 200);
    // the htmx swap target gets nothing back, removing the card
    assert!(body_string(resp).is_empty());

    assert!(crate::marketplace::query::get_listing(&test.app.db, listing_id)
        .unwrap()
        .is_none());

    // the profile list no longer renders the listing
    let profile = Request::builder()
        .method(Method::GET)
        .uri("/profile")
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let body = body_string(handle(profile, &test.app).unwrap());
    assert!(body.contains("You have no listings yet"));
}

#[test]
fn listing_detail_hides_contact_link_from_the_owner() {
    let test = make_test_app();
    let (user_id, token) = sign_up_user(&test.app, "self@example.com");
    let listing_id = test
        .app
        .db
        .with_conn(|conn| Ok(seed_listing(conn, user_id, ListingType::Rent, 1000, false)))
        .unwrap();

    let uri = format!("/category/rent/{listing_id}");

    let as_owner = Request::builder()
        .method(Method::GET)
        .uri(uri.as_str())
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let owner_body = body_string(handle(as_owner, &test.app).unwrap());
    assert!(!owner_body.contains("Contact Landlord"));

    let as_visitor = Request::builder()
        .method(Method::GET)
        .uri(uri.as_str())
        .body(Body::empty())
        .unwrap();
    let visitor_body = body_string(handle(as_visitor, &test.app).unwrap());
    assert!(visitor_body.contains("Contact Landlord"));
    assert!(visitor_body.contains(&format!("/contact/{user_id}?listingName=")));
}

#[test]
fn contact_page_names_the_owner_and_escapes_the_listing_name() {
    let test = make_test_app();
    let (user_id, _token) = sign_up_user(&test.app, "landlord@example.com");

    let req = Request::builder()
        .method(Method::GET)
        .uri(format!(
            "/contact/{user_id}?listingName=Nice%20%3Cscript%3E%20flat"
        ))
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &test.app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Contact Test User"));
    assert!(body.contains("mailto:landlord@example.com"));
    // query-supplied name never lands unescaped in the page
    assert!(!body.contains("<script> flat"));
}

#[test]
fn missing_listing_is_not_found() {
    let test = make_test_app();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/category/rent/9999")
        .body(Body::empty())
        .unwrap();
    match handle(req, &test.app) {
        Err(ServerError::NotFound) => {}
        other => panic!("expected NotFound, got: {:?}", other.map(|r| r.status())),
    }
}
