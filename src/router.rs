// src/router.rs
use std::collections::HashMap;
use std::io::Read;

use astra::Request;

use crate::app::App;
use crate::auth::oauth::STATE_COOKIE;
use crate::auth::password::{
    check_password_strength, generate_salt, hash_password, normalize_email, verify_password,
};
use crate::auth::reset::{ResetConfig, ResetService};
use crate::auth::session::{
    clear_session_cookie, close_session, cookie_value, open_session, session_cookie,
    SessionContext, SESSION_COOKIE,
};
use crate::auth::token::generate_token_default;
use crate::db::users;
use crate::domain::form::ListingForm;
use crate::domain::listing::ListingType;
use crate::errors::ServerError;
use crate::forms::{parse_multipart, parse_urlencoded, split_listing_form};
use crate::marketplace::mutation::MutationService;
use crate::marketplace::query;
use crate::responses::{
    file_response, html_response, redirect_response, redirect_with_cookie, ResultResp,
};
use crate::templates::pages;
use crate::util::now_unix;

const MAX_FORM_BYTES: u64 = 64 * 1024;
const MAX_UPLOAD_BYTES: u64 = 24 * 1024 * 1024;

pub fn handle(req: Request, app: &App) -> ResultResp {
    let (parts, body) = req.into_parts();
    let method = parts.method.as_str();
    let path = parts.uri.path().to_string();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let now = now_unix();
    let cookie_header = parts
        .headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let session_token = cookie_value(cookie_header.as_deref(), SESSION_COOKIE);
    let session = SessionContext::new(&app.db, session_token, now);
    let is_htmx = parts.headers.contains_key("HX-Request");

    match (method, segments.as_slice()) {
        ("GET", [""]) => explore(app, &session),
        ("GET", ["offers"]) => offers(app, &session, &parts.uri, is_htmx),
        ("GET", ["category", type_str]) => category(app, &session, type_str, &parts.uri, is_htmx),
        ("GET", ["category", _, id]) => listing_detail(app, &session, id),

        ("GET", ["sign-in"]) => html_response(pages::sign_in_page(app.google.is_some())),
        ("POST", ["sign-in"]) => sign_in(app, body, now),
        ("GET", ["sign-up"]) => html_response(pages::sign_up_page(app.google.is_some())),
        ("POST", ["sign-up"]) => sign_up(app, body, now),
        ("POST", ["sign-out"]) => sign_out(app, &session, now),

        ("GET", ["forgot-password"]) => html_response(pages::forgot_password_page()),
        ("POST", ["forgot-password"]) => forgot_password(app, body, now, is_htmx),
        ("GET", ["reset-password"]) => reset_password_form(&parts.uri),
        ("POST", ["reset-password"]) => reset_password(app, body, now),

        ("GET", ["oauth", "google"]) => oauth_start(app),
        ("GET", ["oauth", "google", "callback"]) => {
            oauth_callback(app, &parts.uri, cookie_header.as_deref(), now)
        }

        ("GET", ["profile"]) => profile(app, &session),
        ("POST", ["profile", "details"]) => profile_details(app, &session, body),

        ("GET", ["create-listing"]) => create_listing_form(app, &session),
        ("POST", ["create-listing"]) => create_listing(app, &session, &parts.headers, body, now),
        ("GET", ["edit-listing", id]) => edit_listing_form(app, &session, id),
        ("POST", ["edit-listing", id]) => edit_listing(app, &session, &parts.headers, body, id),
        ("POST", ["listings", id, "delete"]) => delete_listing(app, &session, id),

        ("GET", ["contact", owner_id]) => contact(app, &session, owner_id, &parts.uri),

        ("GET", ["uploads", file]) => serve_upload(app, file),
        ("GET", ["static", file]) => serve_static(file),

        _ => Err(ServerError::NotFound),
    }
}

// ---------- browsing ----------

fn explore(app: &App, session: &SessionContext<'_>) -> ResultResp {
    let recent = query::recent_listings(&app.db)?;
    let logged_in = session.current_user()?.is_some();
    html_response(pages::explore_page(&recent, logged_in))
}

fn offers(app: &App, session: &SessionContext<'_>, uri: &http::Uri, is_htmx: bool) -> ResultResp {
    let after = query_param(uri, "after");
    let page = query::offers_page(&app.db, after.as_deref())?;

    if is_htmx {
        return html_response(pages::category_page_partial(
            "/offers",
            &page.items,
            page.next_cursor.as_deref(),
        ));
    }

    let logged_in = session.current_user()?.is_some();
    html_response(pages::category_page(
        "Offers",
        "/offers",
        &page.items,
        page.next_cursor.as_deref(),
        logged_in,
    ))
}

fn category(
    app: &App,
    session: &SessionContext<'_>,
    type_str: &str,
    uri: &http::Uri,
    is_htmx: bool,
) -> ResultResp {
    let listing_type = ListingType::parse(type_str).ok_or(ServerError::NotFound)?;
    let after = query_param(uri, "after");
    let page = query::category_page(&app.db, listing_type, after.as_deref())?;
    let base_path = format!("/category/{}", listing_type.as_str());

    if is_htmx {
        return html_response(pages::category_page_partial(
            &base_path,
            &page.items,
            page.next_cursor.as_deref(),
        ));
    }

    let logged_in = session.current_user()?.is_some();
    let heading = format!("Places for {}", listing_type.label());
    html_response(pages::category_page(
        &heading,
        &base_path,
        &page.items,
        page.next_cursor.as_deref(),
        logged_in,
    ))
}

fn listing_detail(app: &App, session: &SessionContext<'_>, id: &str) -> ResultResp {
    let id = parse_id(id)?;
    let listing = query::get_listing(&app.db, id)?.ok_or(ServerError::NotFound)?;
    let viewer = session.current_user()?;
    let viewer_id = viewer.as_ref().map(|u| u.id);
    html_response(pages::listing_page(&listing, viewer_id, viewer.is_some()))
}

fn contact(
    app: &App,
    session: &SessionContext<'_>,
    owner_id: &str,
    uri: &http::Uri,
) -> ResultResp {
    let owner_id = parse_id(owner_id)?;
    let owner = app
        .db
        .with_conn(|conn| users::find_by_id(conn, owner_id))?
        .ok_or(ServerError::NotFound)?;
    let listing_name = query_param(uri, "listingName");
    let logged_in = session.current_user()?.is_some();
    html_response(pages::contact_page(
        &owner.name,
        &owner.email,
        listing_name.as_deref(),
        logged_in,
    ))
}

// ---------- accounts ----------

fn sign_up(app: &App, body: astra::Body, now: i64) -> ResultResp {
    let fields = read_urlencoded(body)?;
    let name = fields
        .get("name")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServerError::BadRequest("name is required".into()))?;
    let email = normalize_email(fields.get("email").map(String::as_str).unwrap_or(""))?;
    let password = fields
        .get("password")
        .map(String::as_str)
        .unwrap_or_default();
    check_password_strength(password)?;

    let salt = generate_salt();
    let hash = hash_password(password, &salt);

    let token = app.db.with_conn(|conn| {
        let user_id = users::create_password_user(conn, &email, name, &hash, &salt, now)?;
        users::touch_last_login(conn, user_id, now)?;
        open_session(conn, user_id, now)
    })?;

    redirect_with_cookie("/", &session_cookie(&token))
}

fn sign_in(app: &App, body: astra::Body, now: i64) -> ResultResp {
    let fields = read_urlencoded(body)?;
    let email = normalize_email(fields.get("email").map(String::as_str).unwrap_or(""))?;
    let password = fields
        .get("password")
        .map(String::as_str)
        .unwrap_or_default();

    let token = app.db.with_conn(|conn| {
        let user = users::find_by_email(conn, &email)?;
        let (user_id, hash, salt) = match user {
            Some(u) => match (u.password_hash, u.password_salt) {
                (Some(h), Some(s)) => (u.id, h, s),
                // Google-only account; same message as a wrong password
                _ => return Err(bad_credentials()),
            },
            None => return Err(bad_credentials()),
        };

        if !verify_password(password, &salt, &hash) {
            return Err(bad_credentials());
        }

        users::touch_last_login(conn, user_id, now)?;
        open_session(conn, user_id, now)
    })?;

    redirect_with_cookie("/", &session_cookie(&token))
}

fn bad_credentials() -> ServerError {
    ServerError::Unauthorized("wrong email or password".into())
}

fn sign_out(app: &App, session: &SessionContext<'_>, now: i64) -> ResultResp {
    if let Some(raw) = session.raw_token() {
        app.db.with_conn(|conn| close_session(conn, raw, now))?;
    }
    redirect_with_cookie("/", &clear_session_cookie())
}

fn forgot_password(app: &App, body: astra::Body, now: i64, is_htmx: bool) -> ResultResp {
    let fields = read_urlencoded(body)?;
    let email = normalize_email(fields.get("email").map(String::as_str).unwrap_or(""))?;

    let svc = ResetService::new(ResetConfig::default());
    let issued = app.db.with_conn(|conn| svc.request_reset(conn, &email, now))?;

    // Identical response whether or not the account exists.
    if let Some(issued) = issued {
        let link = format!("{}{}", app.base_url, issued.link);
        match &app.mailer {
            Some(mailer) => {
                if let Err(e) = mailer.send_password_reset(&issued.email, &link) {
                    eprintln!("password reset mail failed: {e}");
                }
            }
            None => println!("password reset link for {}: {link}", issued.email),
        }
    }

    if is_htmx {
        html_response(pages::reset_requested_partial(&email))
    } else {
        html_response(pages::forgot_password::reset_requested_page(&email))
    }
}

fn reset_password_form(uri: &http::Uri) -> ResultResp {
    let token = query_param(uri, "token")
        .ok_or_else(|| ServerError::BadRequest("missing reset token".into()))?;
    html_response(pages::reset_password_page(&token))
}

fn reset_password(app: &App, body: astra::Body, now: i64) -> ResultResp {
    let fields = read_urlencoded(body)?;
    let token = fields.get("token").map(String::as_str).unwrap_or("");
    let password = fields
        .get("password")
        .map(String::as_str)
        .unwrap_or_default();

    let svc = ResetService::new(ResetConfig::default());
    let session_token = app.db.with_conn(|conn| {
        let user_id = svc.redeem(conn, token, password, now)?;
        users::touch_last_login(conn, user_id, now)?;
        open_session(conn, user_id, now)
    })?;

    redirect_with_cookie("/", &session_cookie(&session_token))
}

fn oauth_start(app: &App) -> ResultResp {
    let google = app.google.as_ref().ok_or(ServerError::NotFound)?;
    let state = generate_token_default();
    let url = google.authorize_url(&state)?;
    let cookie = format!("{STATE_COOKIE}={state}; Path=/; HttpOnly; SameSite=Lax; Max-Age=600");
    redirect_with_cookie(&url, &cookie)
}

fn oauth_callback(
    app: &App,
    uri: &http::Uri,
    cookie_header: Option<&str>,
    now: i64,
) -> ResultResp {
    let google = app.google.as_ref().ok_or(ServerError::NotFound)?;

    let code = query_param(uri, "code")
        .ok_or_else(|| ServerError::BadRequest("missing oauth code".into()))?;
    let state = query_param(uri, "state")
        .ok_or_else(|| ServerError::BadRequest("missing oauth state".into()))?;
    let expected = cookie_value(cookie_header, STATE_COOKIE)
        .ok_or_else(|| ServerError::Unauthorized("missing oauth state cookie".into()))?;
    if state != expected {
        return Err(ServerError::Unauthorized("oauth state mismatch".into()));
    }

    let identity = google.exchange_code(&code)?;
    let email = normalize_email(&identity.email)?;

    let token = app.db.with_conn(|conn| {
        let user_id =
            users::get_or_create_google_user(conn, &identity.sub, &email, &identity.name, now)?;
        users::touch_last_login(conn, user_id, now)?;
        open_session(conn, user_id, now)
    })?;

    redirect_with_cookie("/", &session_cookie(&token))
}

// ---------- profile ----------

fn profile(app: &App, session: &SessionContext<'_>) -> ResultResp {
    let user = match session.require_user() {
        Ok(user) => user,
        Err(_) => return redirect_response("/sign-in"),
    };

    let listings = query::owner_listings(&app.db, user.id)?;
    html_response(pages::profile_page(&user, &listings))
}

fn profile_details(app: &App, session: &SessionContext<'_>, body: astra::Body) -> ResultResp {
    let user = match session.require_user() {
        Ok(user) => user,
        Err(_) => return redirect_response("/sign-in"),
    };

    let fields = read_urlencoded(body)?;
    let name = fields
        .get("name")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServerError::BadRequest("name is required".into()))?;

    if name != user.name {
        app.db
            .with_conn(|conn| users::update_display_name(conn, user.id, name))?;
    }

    redirect_response("/profile")
}

// ---------- listing mutations ----------

fn mutation_service<'a>(app: &'a App) -> MutationService<'a> {
    MutationService {
        db: &app.db,
        images: &app.images,
        geocoder: app.geocoder.as_ref(),
    }
}

fn create_listing_form(app: &App, session: &SessionContext<'_>) -> ResultResp {
    if session.require_user().is_err() {
        return redirect_response("/sign-in");
    }
    html_response(pages::listing_form_page(
        "Create a Listing",
        "/create-listing",
        None,
        app.geocoder.is_some(),
    ))
}

fn create_listing(
    app: &App,
    session: &SessionContext<'_>,
    headers: &http::HeaderMap,
    body: astra::Body,
    now: i64,
) -> ResultResp {
    let user = match session.require_user() {
        Ok(user) => user,
        Err(_) => return redirect_response("/sign-in"),
    };

    let (fields, uploads) = read_listing_form(headers, body)?;
    let form = ListingForm::from_fields(&fields)?;
    let listing_type = form.listing_type;

    let id = mutation_service(app).create(&user, form, uploads, now)?;
    redirect_response(&format!("/category/{}/{}", listing_type.as_str(), id))
}

fn edit_listing_form(app: &App, session: &SessionContext<'_>, id: &str) -> ResultResp {
    let user = match session.require_user() {
        Ok(user) => user,
        Err(_) => return redirect_response("/sign-in"),
    };

    let id = parse_id(id)?;
    let listing = query::get_listing(&app.db, id)?.ok_or(ServerError::NotFound)?;
    if listing.owner_id != user.id {
        return Err(ServerError::Unauthorized("you can not edit that listing".into()));
    }

    html_response(pages::listing_form_page(
        "Edit Listing",
        &format!("/edit-listing/{id}"),
        Some(&listing),
        app.geocoder.is_some(),
    ))
}

fn edit_listing(
    app: &App,
    session: &SessionContext<'_>,
    headers: &http::HeaderMap,
    body: astra::Body,
    id: &str,
) -> ResultResp {
    let user = match session.require_user() {
        Ok(user) => user,
        Err(_) => return redirect_response("/sign-in"),
    };

    let id = parse_id(id)?;
    let (fields, uploads) = read_listing_form(headers, body)?;
    let form = ListingForm::from_fields(&fields)?;
    let listing_type = form.listing_type;

    mutation_service(app).update(&user, id, form, uploads)?;
    redirect_response(&format!("/category/{}/{}", listing_type.as_str(), id))
}

fn delete_listing(app: &App, session: &SessionContext<'_>, id: &str) -> ResultResp {
    let user = match session.require_user() {
        Ok(user) => user,
        Err(_) => return redirect_response("/sign-in"),
    };

    let id = parse_id(id)?;
    mutation_service(app).delete(&user, id)?;

    // htmx swaps the emptied response over the deleted card
    astra::ResponseBuilder::new()
        .status(200)
        .body(astra::Body::empty())
        .map_err(|_| ServerError::InternalError)
}

// ---------- files ----------

fn serve_upload(app: &App, file: &str) -> ResultResp {
    let bytes = app.images.read(file)?.ok_or(ServerError::NotFound)?;
    file_response(bytes, file)
}

fn serve_static(file: &str) -> ResultResp {
    if file.contains("..") || file.contains('/') || file.contains('\\') {
        return Err(ServerError::NotFound);
    }
    let path = std::path::Path::new("static").join(file);
    let bytes = std::fs::read(path).map_err(|_| ServerError::NotFound)?;
    file_response(bytes, file)
}

// ---------- request plumbing ----------

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse::<i64>().map_err(|_| ServerError::NotFound)
}

fn query_param(uri: &http::Uri, key: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn read_body(mut body: astra::Body, limit: u64) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    body.reader()
        .take(limit)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("could not read request body: {e}")))?;
    Ok(buf)
}

fn read_urlencoded(body: astra::Body) -> Result<HashMap<String, String>, ServerError> {
    let bytes = read_body(body, MAX_FORM_BYTES)?;
    Ok(parse_urlencoded(&bytes))
}

fn read_listing_form(
    headers: &http::HeaderMap,
    body: astra::Body,
) -> Result<(HashMap<String, String>, Vec<crate::domain::form::ImageUpload>), ServerError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        let bytes = read_body(body, MAX_UPLOAD_BYTES)?;
        let parts = parse_multipart(content_type, &bytes)?;
        Ok(split_listing_form(parts))
    } else {
        // a form without files still decodes
        let bytes = read_body(body, MAX_FORM_BYTES)?;
        Ok((parse_urlencoded(&bytes), Vec::new()))
    }
}
