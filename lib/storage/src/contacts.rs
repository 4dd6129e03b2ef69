//! Contact message repository

use rusqlite::{params, Row};
use teashop_core::{Contact, Result};

use crate::store::{db_err, Store};

fn row_to_contact(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        phone_number: row.get(2)?,
        city: row.get(3)?,
        shop: row.get(4)?,
        title: row.get(5)?,
        message: row.get(6)?,
    })
}

impl Store {
    pub fn create_contact(
        &self,
        name: &str,
        phone_number: &str,
        city: Option<&str>,
        shop: Option<&str>,
        title: &str,
        message: &str,
    ) -> Result<Contact> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO contacts (name, phone_number, city, shop, title, message)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![name, phone_number, city, shop, title, message],
        )
        .map_err(db_err)?;

        Ok(Contact {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            city: city.map(str::to_string),
            shop: shop.map(str::to_string),
            title: title.to_string(),
            message: message.to_string(),
        })
    }

    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, phone_number, city, shop, title, message
                 FROM contacts ORDER BY id ASC",
            )
            .map_err(db_err)?;
        let rows = stmt.query_map([], row_to_contact).map_err(db_err)?;

        let mut contacts = Vec::new();
        for row in rows {
            contacts.push(row.map_err(db_err)?);
        }
        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_round_trip() {
        let store = Store::open_in_memory().unwrap();
        store
            .create_contact(
                "Tran Anh",
                "0912345678",
                Some("Hanoi"),
                None,
                "Opening hours",
                "Are you open on Sundays?",
            )
            .unwrap();

        let contacts = store.list_contacts().unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].city.as_deref(), Some("Hanoi"));
        assert!(contacts[0].shop.is_none());
    }
}
