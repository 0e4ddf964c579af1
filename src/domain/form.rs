// src/domain/form.rs
use std::collections::HashMap;

use crate::domain::listing::ListingType;
use crate::errors::ServerError;

pub const MAX_IMAGES: usize = 6;
pub const MIN_PRICE: i64 = 50;
pub const MAX_PRICE: i64 = 750_000_000;

/// An uploaded image file, as carried by the multipart body.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The create/edit listing form, decoded into real types exactly once at the
/// HTTP boundary. Everything past this point works with enums, integers and
/// booleans, not strings.
#[derive(Debug, Clone)]
pub struct ListingForm {
    pub listing_type: ListingType,
    pub name: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub parking: bool,
    pub furnished: bool,
    pub address: String,
    pub offer: bool,
    pub regular_price: i64,
    pub discounted_price: Option<i64>,
    /// Manual coordinates, used only when geocoding is not configured.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn required<'a>(
    fields: &'a HashMap<String, String>,
    key: &str,
) -> Result<&'a str, ServerError> {
    fields
        .get(key)
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest(format!("missing field: {key}")))
}

fn parse_int(fields: &HashMap<String, String>, key: &str) -> Result<i64, ServerError> {
    required(fields, key)?
        .trim()
        .parse::<i64>()
        .map_err(|_| ServerError::BadRequest(format!("{key} must be a number")))
}

fn parse_bool(fields: &HashMap<String, String>, key: &str) -> Result<bool, ServerError> {
    match fields.get(key).map(String::as_str) {
        Some("true") => Ok(true),
        Some("false") | None => Ok(false),
        Some(_) => Err(ServerError::BadRequest(format!("{key} must be true or false"))),
    }
}

fn parse_float(fields: &HashMap<String, String>, key: &str) -> Result<Option<f64>, ServerError> {
    match fields.get(key).map(|s| s.trim()) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ServerError::BadRequest(format!("{key} must be a number"))),
    }
}

impl ListingForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, ServerError> {
        let listing_type = ListingType::parse(required(fields, "type")?)
            .ok_or_else(|| ServerError::BadRequest("type must be rent or sale".into()))?;

        let offer = parse_bool(fields, "offer")?;
        let discounted_price = if offer {
            Some(parse_int(fields, "discounted_price")?)
        } else {
            None
        };

        Ok(Self {
            listing_type,
            name: required(fields, "name")?.trim().to_string(),
            bedrooms: parse_int(fields, "bedrooms")?,
            bathrooms: parse_int(fields, "bathrooms")?,
            parking: parse_bool(fields, "parking")?,
            furnished: parse_bool(fields, "furnished")?,
            address: required(fields, "address")?.trim().to_string(),
            offer,
            regular_price: parse_int(fields, "regular_price")?,
            discounted_price,
            latitude: parse_float(fields, "latitude")?,
            longitude: parse_float(fields, "longitude")?,
        })
    }

    /// All pre-submission checks. Runs before any geocoding, file store or
    /// database work so a bad form never leaves a trace.
    pub fn validate(&self, image_count: usize, require_images: bool) -> Result<(), ServerError> {
        if self.name.chars().count() < 10 || self.name.chars().count() > 32 {
            return Err(ServerError::BadRequest(
                "name must be between 10 and 32 characters".into(),
            ));
        }
        if !(1..=50).contains(&self.bedrooms) || !(1..=50).contains(&self.bathrooms) {
            return Err(ServerError::BadRequest(
                "bedrooms and bathrooms must be between 1 and 50".into(),
            ));
        }
        if !(MIN_PRICE..=MAX_PRICE).contains(&self.regular_price) {
            return Err(ServerError::BadRequest(format!(
                "regular price must be between {MIN_PRICE} and {MAX_PRICE}"
            )));
        }
        if self.offer {
            let discounted = self.discounted_price.ok_or_else(|| {
                ServerError::BadRequest("discounted price is required for offers".into())
            })?;
            if !(MIN_PRICE..=MAX_PRICE).contains(&discounted) {
                return Err(ServerError::BadRequest(format!(
                    "discounted price must be between {MIN_PRICE} and {MAX_PRICE}"
                )));
            }
            if discounted >= self.regular_price {
                return Err(ServerError::BadRequest(
                    "discounted price needs to be less than regular price".into(),
                ));
            }
        }
        if image_count > MAX_IMAGES {
            return Err(ServerError::BadRequest("max 6 images".into()));
        }
        if require_images && image_count == 0 {
            return Err(ServerError::BadRequest("at least one image is required".into()));
        }
        Ok(())
    }
}
