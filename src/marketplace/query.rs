// src/marketplace/query.rs
//
// Read side of the marketplace: category/offer pages with cursor
// pagination, per-owner listings, the explore strip, single lookups.

use crate::db::{listings, Database};
use crate::domain::cursor::PageCursor;
use crate::domain::listing::{Listing, ListingType};
use crate::errors::ServerError;

pub const PAGE_SIZE: usize = 10;
pub const EXPLORE_STRIP_SIZE: usize = 5;

/// One page of listings plus the opaque token for the next page.
/// `next_cursor` is None when this page was short, i.e. there is nothing
/// more to load.
#[derive(Debug)]
pub struct ListingPage {
    pub items: Vec<Listing>,
    pub next_cursor: Option<String>,
}

fn to_page(items: Vec<Listing>) -> ListingPage {
    let next_cursor = if items.len() == PAGE_SIZE {
        items.last().map(|last| {
            PageCursor {
                created_at: last.created_at,
                id: last.id,
            }
            .encode()
        })
    } else {
        None
    };
    ListingPage { items, next_cursor }
}

fn decode_cursor(token: Option<&str>) -> Result<Option<PageCursor>, ServerError> {
    match token {
        None => Ok(None),
        Some(t) => PageCursor::decode(t).map(Some),
    }
}

pub fn category_page(
    db: &Database,
    listing_type: ListingType,
    cursor_token: Option<&str>,
) -> Result<ListingPage, ServerError> {
    let cursor = decode_cursor(cursor_token)?;
    let items =
        db.with_conn(|conn| listings::page_by_type(conn, listing_type, cursor, PAGE_SIZE))?;
    Ok(to_page(items))
}

pub fn offers_page(db: &Database, cursor_token: Option<&str>) -> Result<ListingPage, ServerError> {
    let cursor = decode_cursor(cursor_token)?;
    let items = db.with_conn(|conn| listings::page_offers(conn, cursor, PAGE_SIZE))?;
    Ok(to_page(items))
}

pub fn owner_listings(db: &Database, owner_id: i64) -> Result<Vec<Listing>, ServerError> {
    db.with_conn(|conn| listings::list_by_owner(conn, owner_id))
}

pub fn recent_listings(db: &Database) -> Result<Vec<Listing>, ServerError> {
    db.with_conn(|conn| listings::recent_listings(conn, EXPLORE_STRIP_SIZE))
}

pub fn get_listing(db: &Database, listing_id: i64) -> Result<Option<Listing>, ServerError> {
    db.with_conn(|conn| listings::get_listing(conn, listing_id))
}
