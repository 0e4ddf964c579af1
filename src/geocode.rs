// src/geocode.rs
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::config::Geocoding;
use crate::errors::ServerError;

/// A successfully resolved address.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAddress {
    pub formatted_address: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

pub struct Geocoder {
    cfg: Geocoding,
    client: Client,
}

impl Geocoder {
    pub fn new(cfg: Geocoding) -> Self {
        Self {
            cfg,
            client: Client::new(),
        }
    }

    /// Resolve a free-text address. `Ok(None)` means the service answered
    /// but found nothing (or answered with a shape we can't use) -- that is
    /// a validation problem for the submitter, not a server fault. Transport
    /// errors are `Err`.
    pub fn resolve(&self, address: &str) -> Result<Option<ResolvedAddress>, ServerError> {
        let mut url = Url::parse(&self.cfg.endpoint)
            .map_err(|e| ServerError::ExternalError(format!("bad geocode endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", &self.cfg.api_key);

        let body = self
            .client
            .get(url)
            .send()
            .map_err(|e| ServerError::ExternalError(format!("geocode request failed: {e}")))?
            .text()
            .map_err(|e| ServerError::ExternalError(format!("geocode read failed: {e}")))?;

        Ok(parse_geocode_response(&body))
    }
}

/// Pull the first result out of a geocode payload. Zero results and
/// malformed payloads both come back as None.
fn parse_geocode_response(body: &str) -> Option<ResolvedAddress> {
    let parsed: GeocodeResponse = serde_json::from_str(body).ok()?;
    if parsed.status == "ZERO_RESULTS" {
        return None;
    }
    let first = parsed.results.into_iter().next()?;
    Some(ResolvedAddress {
        formatted_address: first.formatted_address,
        lat: first.geometry.location.lat,
        lng: first.geometry.location.lng,
    })
}
