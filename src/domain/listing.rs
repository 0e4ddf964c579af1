// src/domain/listing.rs

/// The two marketplace categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }

    /// Human label used in headings ("Places for Rent").
    pub fn label(self) -> &'static str {
        match self {
            ListingType::Rent => "Rent",
            ListingType::Sale => "Sale",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rent" => Some(ListingType::Rent),
            "sale" => Some(ListingType::Sale),
            _ => None,
        }
    }
}

/// A listing as read back from the store, images included (ordered,
/// first = cover).
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: i64,
    pub owner_id: i64,
    pub listing_type: ListingType,
    pub name: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub parking: bool,
    pub furnished: bool,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub regular_price: i64,
    pub offer: bool,
    pub discounted_price: Option<i64>,
    pub image_urls: Vec<String>,
    pub created_at: i64,
}

impl Listing {
    /// Discounted price when the listing is on offer, regular price otherwise.
    pub fn display_price(&self) -> i64 {
        if self.offer {
            self.discounted_price.unwrap_or(self.regular_price)
        } else {
            self.regular_price
        }
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Write model produced by the mutation service after validation and
/// geocoding. Raw form-only fields (file uploads, pre-geocode address) never
/// reach this type.
#[derive(Debug, Clone)]
pub struct ListingRecord {
    pub owner_id: i64,
    pub listing_type: ListingType,
    pub name: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub parking: bool,
    pub furnished: bool,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub regular_price: i64,
    pub offer: bool,
    pub discounted_price: Option<i64>,
}
