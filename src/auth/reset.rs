// src/auth/reset.rs
use rusqlite::Connection;

use crate::auth::password::{check_password_strength, generate_salt, hash_password, normalize_email};
use crate::auth::token::{generate_token_default, hash_token};
use crate::db::{password_resets, users};
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct ResetConfig {
    /// TTL for reset links in seconds.
    pub ttl_secs: i64,
    /// Relative path used when building links.
    pub reset_path: String,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 15 * 60,
            reset_path: "/reset-password".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedReset {
    pub email: String,
    pub user_id: i64,
    /// Raw token (never store this in DB).
    pub token: String,
    pub expires_at: i64,
    /// Relative URL like "/reset-password?token=..."
    pub link: String,
}

pub struct ResetService {
    cfg: ResetConfig,
}

impl ResetService {
    pub fn new(cfg: ResetConfig) -> Self {
        Self { cfg }
    }

    fn build_link(&self, token: &str) -> String {
        format!("{}?token={}", self.cfg.reset_path, token)
    }

    /// Request a reset link for an email. Returns Ok(None) when no such
    /// account exists -- the HTTP layer answers "check your email" either
    /// way so the form can't be used to probe for accounts.
    pub fn request_reset(
        &self,
        conn: &Connection,
        email: &str,
        now: i64,
    ) -> Result<Option<IssuedReset>, ServerError> {
        let email = normalize_email(email)?;
        let Some(user) = users::find_by_email(conn, &email)? else {
            return Ok(None);
        };

        let token = generate_token_default();
        let token_hash = hash_token(&token);
        let expires_at = now + self.cfg.ttl_secs;

        password_resets::insert_reset(conn, user.id, &token_hash, now, expires_at)?;

        Ok(Some(IssuedReset {
            email,
            user_id: user.id,
            token: token.clone(),
            expires_at,
            link: self.build_link(&token),
        }))
    }

    /// Redeem a reset token (single-use) and set the new password.
    /// Returns the user id so the caller can open a session.
    pub fn redeem(
        &self,
        conn: &mut Connection,
        token: &str,
        new_password: &str,
        now: i64,
    ) -> Result<i64, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing token".into()));
        }
        check_password_strength(new_password)?;

        let token_hash = hash_token(token);
        let Some(user_id) = password_resets::consume_reset(conn, &token_hash, now)? else {
            return Err(ServerError::Unauthorized("invalid or expired link".into()));
        };

        let salt = generate_salt();
        let hash = hash_password(new_password, &salt);
        users::update_password(conn, user_id, &hash, &salt)?;

        Ok(user_id)
    }
}
