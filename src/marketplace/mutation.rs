// src/marketplace/mutation.rs
//
// Write side of the marketplace. A submission runs as a staged commit:
// validate, geocode, stage every image in the store, then write the record
// and its image rows in one transaction. If anything fails after files hit
// the store, those files are removed again, so an aborted submission leaves
// no orphan blobs.

use crate::auth::session::CurrentUser;
use crate::db::{listings, Database};
use crate::domain::form::{ImageUpload, ListingForm};
use crate::domain::listing::{Listing, ListingRecord};
use crate::errors::ServerError;
use crate::geocode::Geocoder;
use crate::storage::ImageStore;

pub struct MutationService<'a> {
    pub db: &'a Database,
    pub images: &'a ImageStore,
    /// None when geocoding is not configured; the form's manual
    /// latitude/longitude fields are used instead.
    pub geocoder: Option<&'a Geocoder>,
}

impl<'a> MutationService<'a> {
    /// Create a listing. Returns the new listing id.
    pub fn create(
        &self,
        owner: &CurrentUser,
        form: ListingForm,
        uploads: Vec<ImageUpload>,
        now: i64,
    ) -> Result<i64, ServerError> {
        form.validate(uploads.len(), true)?;
        let record = self.build_record(owner.id, &form)?;

        let stored = self.images.store_all(owner.id, &uploads)?;
        let result = self
            .db
            .with_conn(|conn| listings::insert_listing(conn, &record, &stored, now));

        match result {
            Ok(id) => Ok(id),
            Err(e) => {
                self.images.delete_all(&stored);
                Err(e)
            }
        }
    }

    /// Edit a listing. Only the owner may edit; submitting image files
    /// replaces the existing set, submitting none keeps it.
    pub fn update(
        &self,
        owner: &CurrentUser,
        listing_id: i64,
        form: ListingForm,
        uploads: Vec<ImageUpload>,
    ) -> Result<(), ServerError> {
        let existing = self.owned_listing(owner, listing_id, "you can not edit that listing")?;

        form.validate(uploads.len(), false)?;
        let record = self.build_record(existing.owner_id, &form)?;

        if uploads.is_empty() {
            self.db
                .with_conn(|conn| listings::update_listing(conn, listing_id, &record, None))?;
            return Ok(());
        }

        let stored = self.images.store_all(owner.id, &uploads)?;
        let result = self
            .db
            .with_conn(|conn| listings::update_listing(conn, listing_id, &record, Some(&stored)));

        match result {
            Ok(replaced) => {
                // old files go only after the new rows are committed
                self.images.delete_names(&replaced);
                Ok(())
            }
            Err(e) => {
                self.images.delete_all(&stored);
                Err(e)
            }
        }
    }

    /// Delete a listing and its stored images. Only the owner may delete.
    pub fn delete(&self, owner: &CurrentUser, listing_id: i64) -> Result<(), ServerError> {
        self.owned_listing(owner, listing_id, "you can not delete that listing")?;

        let names = self
            .db
            .with_conn(|conn| listings::delete_listing(conn, listing_id))?;
        self.images.delete_names(&names);
        Ok(())
    }

    fn owned_listing(
        &self,
        owner: &CurrentUser,
        listing_id: i64,
        denial: &str,
    ) -> Result<Listing, ServerError> {
        let listing = self
            .db
            .with_conn(|conn| listings::get_listing(conn, listing_id))?
            .ok_or(ServerError::NotFound)?;
        if listing.owner_id != owner.id {
            return Err(ServerError::Unauthorized(denial.into()));
        }
        Ok(listing)
    }

    /// Turn the validated form into the write model: resolve the address
    /// when a geocoder is configured, otherwise take the form's manual
    /// coordinates. The submitted address string becomes the canonical
    /// location either way; the geocoder's formatted address only proves
    /// the address is real.
    fn build_record(&self, owner_id: i64, form: &ListingForm) -> Result<ListingRecord, ServerError> {
        let (latitude, longitude) = match self.geocoder {
            Some(geocoder) => {
                let resolved = geocoder.resolve(&form.address)?.ok_or_else(|| {
                    ServerError::BadRequest("please enter a valid address".into())
                })?;
                (resolved.lat, resolved.lng)
            }
            None => (
                form.latitude.unwrap_or(0.0),
                form.longitude.unwrap_or(0.0),
            ),
        };

        Ok(ListingRecord {
            owner_id,
            listing_type: form.listing_type,
            name: form.name.clone(),
            bedrooms: form.bedrooms,
            bathrooms: form.bathrooms,
            parking: form.parking,
            furnished: form.furnished,
            location: form.address.clone(),
            latitude,
            longitude,
            regular_price: form.regular_price,
            offer: form.offer,
            discounted_price: form.discounted_price,
        })
    }
}
