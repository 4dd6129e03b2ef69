//! Login session repository
//!
//! Sessions carry auth state per request instead of any process-wide
//! notion of a current user. A session row maps an opaque token to a
//! user id; handlers resolve the token from the request cookie.

use chrono::Utc;
use rusqlite::params;
use teashop_core::{Result, User};
use uuid::Uuid;

use crate::store::{db_err, Store};

impl Store {
    /// Create a session for a freshly authenticated user
    pub fn create_session(&self, user_id: i64) -> Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, Utc::now().to_rfc3339()],
        )
        .map_err(db_err)?;
        Ok(token)
    }

    /// Resolve a session token to its user, if the session is live
    pub fn session_user(&self, token: &str) -> Result<Option<User>> {
        let user_id: Option<i64> = {
            let conn = self.conn();
            conn.query_row(
                "SELECT user_id FROM sessions WHERE token = ?1",
                params![token],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(db_err(other)),
            })?
        };

        match user_id {
            Some(id) => Ok(self.get_user(id).ok()),
            None => Ok(None),
        }
    }

    /// Drop a session (logout); unknown tokens are a no-op
    pub fn delete_session(&self, token: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])
            .map_err(db_err)?;
        Ok(())
    }
}
