// src/auth/password.rs
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::auth::token::hashes_equal;
use crate::errors::ServerError;

pub const SALT_BYTES: usize = 16;
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Salted SHA-256 credential. The salt is random per account and stored
/// next to the hash.
pub fn hash_password(password: &str, salt: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

pub fn generate_salt() -> [u8; SALT_BYTES] {
    let mut salt = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut salt);
    salt
}

pub fn verify_password(password: &str, salt: &[u8], expected_hash: &[u8]) -> bool {
    hashes_equal(&hash_password(password, salt), expected_hash)
}

/// Trim + lowercase, minimal sanity check.
pub fn normalize_email(email: &str) -> Result<String, ServerError> {
    let e = email.trim().to_lowercase();
    if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
        return Err(ServerError::BadRequest("invalid email".into()));
    }
    Ok(e)
}

pub fn check_password_strength(password: &str) -> Result<(), ServerError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ServerError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}
