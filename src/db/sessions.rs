// src/db/sessions.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

pub fn insert_session(
    conn: &Connection,
    user_id: i64,
    token_hash: &[u8],
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into sessions (user_id, token_hash, created_at, expires_at)
         values (?, ?, ?, ?)",
        params![user_id, token_hash, now, now + SESSION_TTL_SECS],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;
    Ok(())
}

/// Resolve a session token hash to (user_id, email, name).
/// Expired and revoked sessions do not resolve.
pub fn load_user_from_session(
    conn: &Connection,
    token_hash: &[u8],
    now: i64,
) -> Result<Option<(i64, String, String)>, ServerError> {
    conn.query_row(
        "select u.id, u.email, u.name
         from sessions s
         join users u on u.id = s.user_id
         where s.token_hash = ?
           and s.expires_at > ?
           and s.revoked_at is null",
        params![token_hash, now],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

pub fn revoke_session(
    conn: &Connection,
    token_hash: &[u8],
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, token_hash],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(())
}
