//! User account repository

use std::str::FromStr;

use rusqlite::{params, Row};
use teashop_core::password::{hash_password, verify_password};
use teashop_core::{Error, Result, Role, User};

use crate::store::{db_err, Store};

const USER_COLUMNS: &str = "id, name, email, phone_number, password_hash, role";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone_number: row.get(3)?,
        password_hash: row.get(4)?,
        role: Role::from_str(&role).unwrap_or(Role::User),
    })
}

impl Store {
    /// Register a new customer account
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        phone_number: &str,
        password: &str,
    ) -> Result<User> {
        let conn = self.conn();

        let email_taken: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
                params![email],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if email_taken {
            return Err(Error::EmailTaken(email.to_string()));
        }

        let phone_taken: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE phone_number = ?1)",
                params![phone_number],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if phone_taken {
            return Err(Error::PhoneTaken(phone_number.to_string()));
        }

        let password_hash = hash_password(password);
        conn.execute(
            "INSERT INTO users (name, email, phone_number, password_hash, role)
             VALUES (?1, ?2, ?3, ?4, 'user')",
            params![name, email, phone_number, password_hash],
        )
        .map_err(db_err)?;

        Ok(User {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            phone_number: phone_number.to_string(),
            password_hash,
            role: Role::User,
        })
    }

    /// Check login credentials; the phone number is the account key
    pub fn authenticate(&self, phone_number: &str, password: &str) -> Result<User> {
        let conn = self.conn();
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE phone_number = ?1"),
                params![phone_number],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::InvalidCredentials,
                other => db_err(other),
            })?;

        if verify_password(password, &user.password_hash) {
            Ok(user)
        } else {
            Err(Error::InvalidCredentials)
        }
    }

    pub fn get_user(&self, id: i64) -> Result<User> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            row_to_user,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Error::UserNotFound(id),
            other => db_err(other),
        })
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
            .map_err(db_err)?;
        let rows = stmt.query_map([], row_to_user).map_err(db_err)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row.map_err(db_err)?);
        }
        Ok(users)
    }

    pub fn delete_user(&self, id: i64) -> Result<()> {
        let conn = self.conn();
        let deleted = conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .map_err(db_err)?;
        if deleted == 0 {
            return Err(Error::UserNotFound(id));
        }
        Ok(())
    }

    pub fn update_user_role(&self, id: i64, role: Role) -> Result<User> {
        let conn = self.conn();
        let updated = conn
            .execute(
                "UPDATE users SET role = ?1 WHERE id = ?2",
                params![role.as_str(), id],
            )
            .map_err(db_err)?;
        if updated == 0 {
            return Err(Error::UserNotFound(id));
        }

        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            row_to_user,
        )
        .map_err(db_err)
    }

    /// Update name, email and phone number of an existing account
    pub fn update_profile(
        &self,
        id: i64,
        name: &str,
        email: &str,
        phone_number: &str,
    ) -> Result<User> {
        let conn = self.conn();

        let email_taken: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1 AND id != ?2)",
                params![email, id],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if email_taken {
            return Err(Error::EmailTaken(email.to_string()));
        }

        let phone_taken: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE phone_number = ?1 AND id != ?2)",
                params![phone_number, id],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if phone_taken {
            return Err(Error::PhoneTaken(phone_number.to_string()));
        }

        let updated = conn
            .execute(
                "UPDATE users SET name = ?1, email = ?2, phone_number = ?3 WHERE id = ?4",
                params![name, email, phone_number, id],
            )
            .map_err(db_err)?;
        if updated == 0 {
            return Err(Error::UserNotFound(id));
        }

        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            row_to_user,
        )
        .map_err(db_err)
    }
}
