//! Cart repository

use std::str::FromStr;

use chrono::Utc;
use rusqlite::{params, Row};
use teashop_core::{CartItem, Error, Result, Size};

use crate::store::{db_err, parse_timestamp, Store};

const CART_COLUMNS: &str = "id, user_id, product_id, name, picture, size, sugar_level, ice_level, \
                            quantity, total_price, date_added";

fn row_to_cart_item(row: &Row<'_>) -> rusqlite::Result<CartItem> {
    let size: String = row.get(5)?;
    Ok(CartItem {
        id: row.get(0)?,
        user_id: row.get(1)?,
        product_id: row.get(2)?,
        name: row.get(3)?,
        picture: row.get(4)?,
        size: Size::from_str(&size).unwrap_or(Size::M),
        sugar_level: row.get(6)?,
        ice_level: row.get(7)?,
        quantity: row.get(8)?,
        total_price: row.get(9)?,
        date_added: parse_timestamp(&row.get::<_, String>(10)?),
    })
}

impl Store {
    /// Add a product to a user's cart
    ///
    /// An existing line with the same (product, size, sugar, ice)
    /// combination absorbs the new quantity; otherwise a new line is
    /// created. The line total uses the product price plus the size
    /// surcharge at the time of adding.
    pub fn add_to_cart(
        &self,
        user_id: i64,
        product_id: i64,
        size: Size,
        sugar_level: &str,
        ice_level: &str,
        quantity: i64,
    ) -> Result<CartItem> {
        let mut conn = self.conn();
        let tx = conn.transaction().map_err(db_err)?;

        let product: (String, String, i64) = tx
            .query_row(
                "SELECT name, picture, price FROM products WHERE id = ?1",
                params![product_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::ProductNotFound(product_id),
                other => db_err(other),
            })?;
        let (name, picture, price) = product;
        let line_total = (price + size.surcharge()) * quantity;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM cart_items
                 WHERE user_id = ?1 AND product_id = ?2 AND size = ?3
                   AND sugar_level = ?4 AND ice_level = ?5",
                params![user_id, product_id, size.as_str(), sugar_level, ice_level],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(db_err(other)),
            })?;

        let item_id = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE cart_items SET quantity = quantity + ?1,
                     total_price = total_price + ?2 WHERE id = ?3",
                    params![quantity, line_total, id],
                )
                .map_err(db_err)?;
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO cart_items (user_id, product_id, name, picture, size,
                     sugar_level, ice_level, quantity, total_price, date_added)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        user_id,
                        product_id,
                        name,
                        picture,
                        size.as_str(),
                        sugar_level,
                        ice_level,
                        quantity,
                        line_total,
                        Utc::now().to_rfc3339()
                    ],
                )
                .map_err(db_err)?;
                tx.last_insert_rowid()
            }
        };

        let item = tx
            .query_row(
                &format!("SELECT {CART_COLUMNS} FROM cart_items WHERE id = ?1"),
                params![item_id],
                row_to_cart_item,
            )
            .map_err(db_err)?;
        tx.commit().map_err(db_err)?;
        Ok(item)
    }

    pub fn cart_items(&self, user_id: i64) -> Result<Vec<CartItem>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {CART_COLUMNS} FROM cart_items WHERE user_id = ?1 ORDER BY id ASC"
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![user_id], row_to_cart_item)
            .map_err(db_err)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row.map_err(db_err)?);
        }
        Ok(items)
    }

    /// Number of cart lines, shown in the page header
    pub fn cart_count(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COUNT(*) FROM cart_items WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .map_err(db_err)
    }

    pub fn cart_total(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COALESCE(SUM(total_price), 0) FROM cart_items WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .map_err(db_err)
    }

    /// Remove one of the user's own cart lines
    pub fn remove_cart_item(&self, user_id: i64, item_id: i64) -> Result<()> {
        let conn = self.conn();
        let deleted = conn
            .execute(
                "DELETE FROM cart_items WHERE id = ?1 AND user_id = ?2",
                params![item_id, user_id],
            )
            .map_err(db_err)?;
        if deleted == 0 {
            return Err(Error::CartItemNotFound(item_id));
        }
        Ok(())
    }

    pub fn clear_cart(&self, user_id: i64) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM cart_items WHERE user_id = ?1", params![user_id])
            .map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> (Store, i64, i64) {
        let store = Store::open_in_memory().unwrap();
        let category = store.create_category("Tea", "tea.jpg").unwrap();
        let product = store
            .create_product("Iced Milk Tea", category.id, "milk-tea.jpg", 30)
            .unwrap();
        let user = store
            .create_user("Tran Anh", "tran@example.com", "0912345678", "secret-pass")
            .unwrap();
        (store, user.id, product.id)
    }

    #[test]
    fn test_add_to_cart_prices_by_size() {
        let (store, user, product) = seeded_store();

        let medium = store
            .add_to_cart(user, product, Size::M, "50", "100", 2)
            .unwrap();
        assert_eq!(medium.total_price, 60);

        let large = store
            .add_to_cart(user, product, Size::L, "50", "100", 1)
            .unwrap();
        assert_eq!(large.total_price, 35);

        assert_eq!(store.cart_count(user).unwrap(), 2);
        assert_eq!(store.cart_total(user).unwrap(), 95);
    }

    #[test]
    fn test_same_options_merge_into_one_line() {
        let (store, user, product) = seeded_store();

        store
            .add_to_cart(user, product, Size::M, "50", "100", 1)
            .unwrap();
        let merged = store
            .add_to_cart(user, product, Size::M, "50", "100", 2)
            .unwrap();

        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.total_price, 90);
        assert_eq!(store.cart_count(user).unwrap(), 1);
    }

    #[test]
    fn test_different_options_stay_separate() {
        let (store, user, product) = seeded_store();

        store
            .add_to_cart(user, product, Size::M, "50", "100", 1)
            .unwrap();
        store
            .add_to_cart(user, product, Size::M, "70", "100", 1)
            .unwrap();

        assert_eq!(store.cart_count(user).unwrap(), 2);
    }

    #[test]
    fn test_add_unknown_product() {
        let (store, user, _) = seeded_store();
        assert!(matches!(
            store.add_to_cart(user, 99, Size::M, "50", "100", 1),
            Err(Error::ProductNotFound(99))
        ));
    }

    #[test]
    fn test_remove_only_own_lines() {
        let (store, user, product) = seeded_store();
        let other = store
            .create_user("Other", "other@example.com", "0911111111", "secret-pass")
            .unwrap();

        let line = store
            .add_to_cart(user, product, Size::M, "50", "100", 1)
            .unwrap();

        assert!(matches!(
            store.remove_cart_item(other.id, line.id),
            Err(Error::CartItemNotFound(_))
        ));
        store.remove_cart_item(user, line.id).unwrap();
        assert_eq!(store.cart_count(user).unwrap(), 0);
    }

    #[test]
    fn test_clear_cart() {
        let (store, user, product) = seeded_store();
        store
            .add_to_cart(user, product, Size::M, "50", "100", 1)
            .unwrap();
        store
            .add_to_cart(user, product, Size::L, "50", "100", 1)
            .unwrap();

        store.clear_cart(user).unwrap();
        assert_eq!(store.cart_count(user).unwrap(), 0);
        assert_eq!(store.cart_total(user).unwrap(), 0);
    }
}
