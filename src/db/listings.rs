// src/db/listings.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::cursor::PageCursor;
use crate::domain::listing::{Listing, ListingRecord, ListingType};
use crate::errors::ServerError;
use crate::storage::StoredImage;

const LISTING_COLS: &str = "id, owner_id, listing_type, name, bedrooms, bathrooms, parking, \
     furnished, location, latitude, longitude, regular_price, offer, discounted_price, created_at";

fn row_to_listing(r: &rusqlite::Row<'_>) -> rusqlite::Result<Listing> {
    let type_str: String = r.get(2)?;
    Ok(Listing {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        // the column has a CHECK constraint, so parse can only fail on a
        // corrupted database
        listing_type: ListingType::parse(&type_str).unwrap_or(ListingType::Rent),
        name: r.get(3)?,
        bedrooms: r.get(4)?,
        bathrooms: r.get(5)?,
        parking: r.get(6)?,
        furnished: r.get(7)?,
        location: r.get(8)?,
        latitude: r.get(9)?,
        longitude: r.get(10)?,
        regular_price: r.get(11)?,
        offer: r.get(12)?,
        discounted_price: r.get(13)?,
        image_urls: Vec::new(),
        created_at: r.get(14)?,
    })
}

fn load_images(conn: &Connection, listing_id: i64) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn
        .prepare("select url from listing_images where listing_id = ? order by position")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![listing_id], |r| r.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut urls = Vec::new();
    for r in rows {
        urls.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(urls)
}

fn attach_images(conn: &Connection, mut listings: Vec<Listing>) -> Result<Vec<Listing>, ServerError> {
    for listing in &mut listings {
        listing.image_urls = load_images(conn, listing.id)?;
    }
    Ok(listings)
}

/// Insert a listing and its image rows in one transaction. The record only
/// becomes visible once every image is already in the store.
pub fn insert_listing(
    conn: &mut Connection,
    record: &ListingRecord,
    images: &[StoredImage],
    now: i64,
) -> Result<i64, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    tx.execute(
        "insert into listings (
            owner_id, listing_type, name, bedrooms, bathrooms, parking, furnished,
            location, latitude, longitude, regular_price, offer, discounted_price, created_at
         ) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            record.owner_id,
            record.listing_type.as_str(),
            record.name,
            record.bedrooms,
            record.bathrooms,
            record.parking,
            record.furnished,
            record.location,
            record.latitude,
            record.longitude,
            record.regular_price,
            record.offer,
            record.discounted_price,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert listing failed: {e}")))?;

    let listing_id = tx.last_insert_rowid();
    insert_image_rows(&tx, listing_id, images)?;

    tx.commit()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    Ok(listing_id)
}

/// Update a listing in place. When `new_images` is Some, the image rows are
/// replaced and the old stored file names are returned so the caller can
/// remove the files after the transaction commits.
pub fn update_listing(
    conn: &mut Connection,
    listing_id: i64,
    record: &ListingRecord,
    new_images: Option<&[StoredImage]>,
) -> Result<Vec<String>, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    tx.execute(
        "update listings set
            listing_type = ?, name = ?, bedrooms = ?, bathrooms = ?, parking = ?,
            furnished = ?, location = ?, latitude = ?, longitude = ?,
            regular_price = ?, offer = ?, discounted_price = ?
         where id = ?",
        params![
            record.listing_type.as_str(),
            record.name,
            record.bedrooms,
            record.bathrooms,
            record.parking,
            record.furnished,
            record.location,
            record.latitude,
            record.longitude,
            record.regular_price,
            record.offer,
            record.discounted_price,
            listing_id,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("update listing failed: {e}")))?;

    let mut replaced = Vec::new();
    if let Some(images) = new_images {
        replaced = stored_names(&tx, listing_id)?;
        tx.execute(
            "delete from listing_images where listing_id = ?",
            params![listing_id],
        )
        .map_err(|e| ServerError::DbError(format!("delete old images failed: {e}")))?;
        insert_image_rows(&tx, listing_id, images)?;
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    Ok(replaced)
}

/// Delete a listing and return the stored file names of its images so the
/// caller can remove the files.
pub fn delete_listing(conn: &mut Connection, listing_id: i64) -> Result<Vec<String>, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let names = stored_names(&tx, listing_id)?;

    tx.execute("delete from listings where id = ?", params![listing_id])
        .map_err(|e| ServerError::DbError(format!("delete listing failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    Ok(names)
}

fn insert_image_rows(
    tx: &rusqlite::Transaction<'_>,
    listing_id: i64,
    images: &[StoredImage],
) -> Result<(), ServerError> {
    for (position, image) in images.iter().enumerate() {
        tx.execute(
            "insert into listing_images (listing_id, position, url, stored_name)
             values (?, ?, ?, ?)",
            params![listing_id, position as i64, image.url, image.stored_name],
        )
        .map_err(|e| ServerError::DbError(format!("insert image failed: {e}")))?;
    }
    Ok(())
}

fn stored_names(conn: &Connection, listing_id: i64) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn
        .prepare("select stored_name from listing_images where listing_id = ?")
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    let rows = stmt
        .query_map(params![listing_id], |r| r.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut names = Vec::new();
    for r in rows {
        names.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(names)
}

pub fn get_listing(conn: &Connection, listing_id: i64) -> Result<Option<Listing>, ServerError> {
    let listing = conn
        .query_row(
            &format!("select {LISTING_COLS} from listings where id = ?"),
            params![listing_id],
            row_to_listing,
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select listing failed: {e}")))?;

    match listing {
        Some(mut l) => {
            l.image_urls = load_images(conn, l.id)?;
            Ok(Some(l))
        }
        None => Ok(None),
    }
}

/// One page of a category, newest first, resuming strictly after `cursor`
/// when given. Fetches `page_size` rows; the caller derives the next cursor
/// from the final row when the page is full.
pub fn page_by_type(
    conn: &Connection,
    listing_type: ListingType,
    cursor: Option<PageCursor>,
    page_size: usize,
) -> Result<Vec<Listing>, ServerError> {
    let cursor = cursor.unwrap_or(PageCursor {
        created_at: i64::MAX,
        id: i64::MAX,
    });

    let mut stmt = conn
        .prepare(&format!(
            "select {LISTING_COLS} from listings
             where listing_type = ?
               and (created_at < ? or (created_at = ? and id < ?))
             order by created_at desc, id desc
             limit ?"
        ))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(
            params![
                listing_type.as_str(),
                cursor.created_at,
                cursor.created_at,
                cursor.id,
                page_size as i64
            ],
            row_to_listing,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut listings = Vec::new();
    for r in rows {
        listings.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    attach_images(conn, listings)
}

/// One page of listings currently on offer, across both categories.
pub fn page_offers(
    conn: &Connection,
    cursor: Option<PageCursor>,
    page_size: usize,
) -> Result<Vec<Listing>, ServerError> {
    let cursor = cursor.unwrap_or(PageCursor {
        created_at: i64::MAX,
        id: i64::MAX,
    });

    let mut stmt = conn
        .prepare(&format!(
            "select {LISTING_COLS} from listings
             where offer = 1
               and (created_at < ? or (created_at = ? and id < ?))
             order by created_at desc, id desc
             limit ?"
        ))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(
            params![cursor.created_at, cursor.created_at, cursor.id, page_size as i64],
            row_to_listing,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut listings = Vec::new();
    for r in rows {
        listings.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    attach_images(conn, listings)
}

/// All of one owner's listings, newest first, unbounded.
pub fn list_by_owner(conn: &Connection, owner_id: i64) -> Result<Vec<Listing>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {LISTING_COLS} from listings
             where owner_id = ?
             order by created_at desc, id desc"
        ))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![owner_id], row_to_listing)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut listings = Vec::new();
    for r in rows {
        listings.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    attach_images(conn, listings)
}

/// Newest listings across both categories (explore page strip).
pub fn recent_listings(conn: &Connection, limit: usize) -> Result<Vec<Listing>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {LISTING_COLS} from listings
             order by created_at desc, id desc
             limit ?"
        ))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit as i64], row_to_listing)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut listings = Vec::new();
    for r in rows {
        listings.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    attach_images(conn, listings)
}
