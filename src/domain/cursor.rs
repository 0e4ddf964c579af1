// src/domain/cursor.rs
use base64::Engine;

use crate::errors::ServerError;

/// Opaque continuation token for "load more" pagination.
///
/// Encodes the (created_at, id) of the last row of the previous page so the
/// next query can resume strictly after it, without tying the HTTP surface
/// to any storage-level cursor representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub created_at: i64,
    pub id: i64,
}

impl PageCursor {
    pub fn encode(&self) -> String {
        let raw = format!("{}:{}", self.created_at, self.id);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    pub fn decode(token: &str) -> Result<Self, ServerError> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|_| ServerError::BadRequest("invalid page cursor".into()))?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| ServerError::BadRequest("invalid page cursor".into()))?;

        let mut parts = raw.splitn(2, ':');
        let created_at = parts
            .next()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| ServerError::BadRequest("invalid page cursor".into()))?;
        let id = parts
            .next()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| ServerError::BadRequest("invalid page cursor".into()))?;

        Ok(Self { created_at, id })
    }
}
