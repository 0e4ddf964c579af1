// src/auth/session.rs
use std::cell::RefCell;

use rusqlite::Connection;

use crate::auth::token::{generate_token_default, hash_token};
use crate::db::{sessions, Database};
use crate::errors::ServerError;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Tri-state session status. A context starts out `Checking` and moves to
/// exactly one of the other two states on first observation; the result is
/// held for the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Checking,
    Authenticated(CurrentUser),
    Unauthenticated,
}

/// Explicit, injectable session context. Built per request from the session
/// cookie; nothing about it is global. Resolution against the database is
/// lazy and happens at most once.
pub struct SessionContext<'a> {
    db: &'a Database,
    raw_token: Option<String>,
    now: i64,
    resolved: RefCell<Option<SessionStatus>>,
}

impl<'a> SessionContext<'a> {
    pub fn new(db: &'a Database, raw_token: Option<String>, now: i64) -> Self {
        Self {
            db,
            raw_token,
            now,
            resolved: RefCell::new(None),
        }
    }

    /// The current state without forcing resolution: `Checking` until the
    /// first `resolve` call, then whatever that call produced.
    pub fn status(&self) -> SessionStatus {
        self.resolved
            .borrow()
            .clone()
            .unwrap_or(SessionStatus::Checking)
    }

    /// Observe the session, transitioning checking -> authenticated or
    /// checking -> unauthenticated. Subsequent calls return the cached
    /// outcome without touching the database again.
    pub fn resolve(&self) -> Result<SessionStatus, ServerError> {
        if let Some(status) = self.resolved.borrow().clone() {
            return Ok(status);
        }

        let status = match &self.raw_token {
            None => SessionStatus::Unauthenticated,
            Some(raw) => {
                let hash = hash_token(raw);
                let hit = self
                    .db
                    .with_conn(|conn| sessions::load_user_from_session(conn, &hash, self.now))?;
                match hit {
                    Some((id, email, name)) => {
                        SessionStatus::Authenticated(CurrentUser { id, email, name })
                    }
                    None => SessionStatus::Unauthenticated,
                }
            }
        };

        *self.resolved.borrow_mut() = Some(status.clone());
        Ok(status)
    }

    pub fn current_user(&self) -> Result<Option<CurrentUser>, ServerError> {
        match self.resolve()? {
            SessionStatus::Authenticated(user) => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    /// For auth-gated routes. The router turns the Unauthorized error into a
    /// redirect to /sign-in.
    pub fn require_user(&self) -> Result<CurrentUser, ServerError> {
        self.current_user()?
            .ok_or_else(|| ServerError::Unauthorized("sign in required".into()))
    }

    pub fn raw_token(&self) -> Option<&str> {
        self.raw_token.as_deref()
    }
}

/// Create a session row for the user and return the raw cookie token.
pub fn open_session(conn: &Connection, user_id: i64, now: i64) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);
    sessions::insert_session(conn, user_id, &hash, now)?;
    Ok(raw_token)
}

/// Revoke the session behind the raw token (sign-out).
pub fn close_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = hash_token(raw_token);
    sessions::revoke_session(conn, &hash, now)
}

/// Pull a named cookie out of a Cookie header value.
pub fn cookie_value(header: Option<&str>, name: &str) -> Option<String> {
    let header = header?;
    for pair in header.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if let (Some(k), Some(v)) = (parts.next(), parts.next()) {
            if k == name {
                return Some(v.to_string());
            }
        }
    }
    None
}

pub fn session_cookie(raw_token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={raw_token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        sessions::SESSION_TTL_SECS
    )
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
