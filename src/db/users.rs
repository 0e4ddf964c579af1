// src/db/users.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: Option<Vec<u8>>,
    pub password_salt: Option<Vec<u8>>,
    pub google_sub: Option<String>,
    pub created_at: i64,
}

fn row_to_user(r: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: r.get(0)?,
        email: r.get(1)?,
        name: r.get(2)?,
        password_hash: r.get(3)?,
        password_salt: r.get(4)?,
        google_sub: r.get(5)?,
        created_at: r.get(6)?,
    })
}

const USER_COLS: &str =
    "id, email, name, password_hash, password_salt, google_sub, created_at";

/// Insert a password account. Email should already be normalized by caller
/// (trim/lowercase). A duplicate email is a user-facing BadRequest, not a
/// DbError.
pub fn create_password_user(
    conn: &Connection,
    email: &str,
    name: &str,
    password_hash: &[u8],
    password_salt: &[u8],
    now: i64,
) -> Result<i64, ServerError> {
    let inserted = conn.execute(
        "insert or ignore into users (email, name, password_hash, password_salt, created_at)
         values (?, ?, ?, ?, ?)",
        params![email, name, password_hash, password_salt, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert user failed: {e}")))?;

    if inserted == 0 {
        return Err(ServerError::BadRequest(
            "an account with that email already exists".into(),
        ));
    }

    Ok(conn.last_insert_rowid())
}

/// Find-or-create for the Google flow. Matches on google_sub first, then
/// adopts an existing password account with the same email, then creates a
/// fresh account.
pub fn get_or_create_google_user(
    conn: &Connection,
    google_sub: &str,
    email: &str,
    name: &str,
    now: i64,
) -> Result<i64, ServerError> {
    let existing: Option<i64> = conn
        .query_row(
            "select id from users where google_sub = ?",
            params![google_sub],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select by google_sub failed: {e}")))?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let by_email: Option<i64> = conn
        .query_row("select id from users where email = ?", params![email], |r| {
            r.get(0)
        })
        .optional()
        .map_err(|e| ServerError::DbError(format!("select by email failed: {e}")))?;

    if let Some(id) = by_email {
        conn.execute(
            "update users set google_sub = ? where id = ?",
            params![google_sub, id],
        )
        .map_err(|e| ServerError::DbError(format!("link google_sub failed: {e}")))?;
        return Ok(id);
    }

    conn.execute(
        "insert into users (email, name, google_sub, created_at) values (?, ?, ?, ?)",
        params![email, name, google_sub, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert google user failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>, ServerError> {
    conn.query_row(
        &format!("select {USER_COLS} from users where email = ?"),
        params![email],
        row_to_user,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user by email failed: {e}")))
}

pub fn find_by_id(conn: &Connection, user_id: i64) -> Result<Option<UserRow>, ServerError> {
    conn.query_row(
        &format!("select {USER_COLS} from users where id = ?"),
        params![user_id],
        row_to_user,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user by id failed: {e}")))
}

pub fn update_display_name(
    conn: &Connection,
    user_id: i64,
    name: &str,
) -> Result<(), ServerError> {
    conn.execute(
        "update users set name = ? where id = ?",
        params![name, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("update display name failed: {e}")))?;
    Ok(())
}

pub fn update_password(
    conn: &Connection,
    user_id: i64,
    password_hash: &[u8],
    password_salt: &[u8],
) -> Result<(), ServerError> {
    conn.execute(
        "update users set password_hash = ?, password_salt = ? where id = ?",
        params![password_hash, password_salt, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("update password failed: {e}")))?;
    Ok(())
}

pub fn touch_last_login(conn: &Connection, user_id: i64, now: i64) -> Result<(), ServerError> {
    conn.execute(
        "update users set last_login_at = ? where id = ?",
        params![now, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("update last_login_at failed: {e}")))?;
    Ok(())
}
