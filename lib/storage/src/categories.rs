//! Category repository

use rusqlite::{params, Row};
use teashop_core::{Category, Error, Result};

use crate::store::{db_err, Store};

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        picture: row.get(2)?,
    })
}

impl Store {
    pub fn create_category(&self, name: &str, picture: &str) -> Result<Category> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO categories (name, picture) VALUES (?1, ?2)",
            params![name, picture],
        )
        .map_err(db_err)?;

        let id = conn.last_insert_rowid();
        Ok(Category {
            id,
            name: name.to_string(),
            picture: picture.to_string(),
        })
    }

    pub fn get_category(&self, id: i64) -> Result<Category> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, picture FROM categories WHERE id = ?1",
            params![id],
            row_to_category,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound(id),
            other => db_err(other),
        })
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, name, picture FROM categories ORDER BY id ASC")
            .map_err(db_err)?;
        let rows = stmt.query_map([], row_to_category).map_err(db_err)?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row.map_err(db_err)?);
        }
        Ok(categories)
    }

    pub fn update_category(&self, id: i64, name: &str, picture: &str) -> Result<Category> {
        let conn = self.conn();
        let updated = conn
            .execute(
                "UPDATE categories SET name = ?1, picture = ?2 WHERE id = ?3",
                params![name, picture, id],
            )
            .map_err(db_err)?;
        if updated == 0 {
            return Err(Error::CategoryNotFound(id));
        }
        Ok(Category {
            id,
            name: name.to_string(),
            picture: picture.to_string(),
        })
    }

    /// Delete a category together with its products
    ///
    /// Refused while any product of the category appears on an order,
    /// matching the single-product delete guard.
    pub fn delete_category(&self, id: i64) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().map_err(db_err)?;

        let exists: bool = tx
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
                params![id],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if !exists {
            return Err(Error::CategoryNotFound(id));
        }

        let ordered_product: Option<i64> = tx
            .query_row(
                "SELECT p.id FROM products p
                 JOIN order_items oi ON oi.product_id = p.id
                 WHERE p.category_id = ?1 LIMIT 1",
                params![id],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(db_err(other)),
            })?;
        if let Some(product_id) = ordered_product {
            return Err(Error::ProductOrdered(product_id));
        }

        tx.execute("DELETE FROM products WHERE category_id = ?1", params![id])
            .map_err(db_err)?;
        tx.execute("DELETE FROM categories WHERE id = ?1", params![id])
            .map_err(db_err)?;
        tx.commit().map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_crud() {
        let store = Store::open_in_memory().unwrap();
        let category = store.create_category("Tea", "tea.jpg").unwrap();
        assert_eq!(store.get_category(category.id).unwrap().name, "Tea");

        let updated = store
            .update_category(category.id, "Teas", "teas.jpg")
            .unwrap();
        assert_eq!(updated.name, "Teas");

        store.delete_category(category.id).unwrap();
        assert!(matches!(
            store.get_category(category.id),
            Err(Error::CategoryNotFound(_))
        ));
    }

    #[test]
    fn test_delete_category_cascades_to_products() {
        let store = Store::open_in_memory().unwrap();
        let category = store.create_category("Tea", "tea.jpg").unwrap();
        let product = store
            .create_product("Sencha", category.id, "s.jpg", 20)
            .unwrap();

        store.delete_category(category.id).unwrap();
        assert!(matches!(
            store.get_product(product.id),
            Err(Error::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_missing_category_errors() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.update_category(3, "x", "y"),
            Err(Error::CategoryNotFound(3))
        ));
        assert!(matches!(
            store.delete_category(3),
            Err(Error::CategoryNotFound(3))
        ));
    }
}
