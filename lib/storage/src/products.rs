//! Catalog repository

use chrono::Utc;
use rusqlite::{params, Row};
use teashop_core::{Error, Product, ProductSort, Result};

use crate::store::{db_err, parse_timestamp, Store};

const PRODUCT_COLUMNS: &str = "id, name, category_id, picture, price, sell_count, date_added";

fn row_to_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        category_id: row.get(2)?,
        picture: row.get(3)?,
        price: row.get(4)?,
        sell_count: row.get(5)?,
        date_added: parse_timestamp(&row.get::<_, String>(6)?),
    })
}

impl Store {
    pub fn create_product(
        &self,
        name: &str,
        category_id: i64,
        picture: &str,
        price: i64,
    ) -> Result<Product> {
        let conn = self.conn();

        let category_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
                params![category_id],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if !category_exists {
            return Err(Error::CategoryNotFound(category_id));
        }

        conn.execute(
            "INSERT INTO products (name, category_id, picture, price, sell_count, date_added)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![name, category_id, picture, price, Utc::now().to_rfc3339()],
        )
        .map_err(db_err)?;

        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
            params![id],
            row_to_product,
        )
        .map_err(db_err)
    }

    pub fn get_product(&self, id: i64) -> Result<Product> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
            params![id],
            row_to_product,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Error::ProductNotFound(id),
            other => db_err(other),
        })
    }

    /// Catalog listing with optional category filter
    pub fn list_products(
        &self,
        category_id: Option<i64>,
        sort: ProductSort,
    ) -> Result<Vec<Product>> {
        let order_by = match sort {
            ProductSort::Newest => "date_added DESC, id ASC",
            ProductSort::PriceAsc => "price ASC, id ASC",
            ProductSort::PriceDesc => "price DESC, id ASC",
            ProductSort::BestSelling => "sell_count DESC, id ASC",
        };

        let conn = self.conn();
        let mut products = Vec::new();
        match category_id {
            Some(category) => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = ?1
                         ORDER BY {order_by}"
                    ))
                    .map_err(db_err)?;
                let rows = stmt
                    .query_map(params![category], row_to_product)
                    .map_err(db_err)?;
                for row in rows {
                    products.push(row.map_err(db_err)?);
                }
            }
            None => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY {order_by}"
                    ))
                    .map_err(db_err)?;
                let rows = stmt.query_map([], row_to_product).map_err(db_err)?;
                for row in rows {
                    products.push(row.map_err(db_err)?);
                }
            }
        }
        Ok(products)
    }

    /// Case-insensitive substring match on product name
    pub fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE name LIKE ?1 ORDER BY id ASC"
            ))
            .map_err(db_err)?;

        let pattern = format!("%{query}%");
        let rows = stmt
            .query_map(params![pattern], row_to_product)
            .map_err(db_err)?;

        let mut products = Vec::new();
        for row in rows {
            products.push(row.map_err(db_err)?);
        }
        Ok(products)
    }

    /// Best sellers for the home page
    pub fn top_products(&self, limit: usize) -> Result<Vec<Product>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY sell_count DESC, id ASC LIMIT ?1"
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![limit as i64], row_to_product)
            .map_err(db_err)?;

        let mut products = Vec::new();
        for row in rows {
            products.push(row.map_err(db_err)?);
        }
        Ok(products)
    }

    /// Read-only (id, name) snapshot of the whole catalog in iteration
    /// order, as consumed by the similarity engine
    pub fn catalog_snapshot(&self) -> Result<Vec<(i64, String)>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, name FROM products ORDER BY id ASC")
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(db_err)?;

        let mut snapshot = Vec::new();
        for row in rows {
            snapshot.push(row.map_err(db_err)?);
        }
        Ok(snapshot)
    }

    pub fn update_product(
        &self,
        id: i64,
        name: &str,
        category_id: i64,
        picture: &str,
        price: i64,
    ) -> Result<Product> {
        let conn = self.conn();

        let category_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
                params![category_id],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if !category_exists {
            return Err(Error::CategoryNotFound(category_id));
        }

        let updated = conn
            .execute(
                "UPDATE products SET name = ?1, category_id = ?2, picture = ?3, price = ?4
                 WHERE id = ?5",
                params![name, category_id, picture, price, id],
            )
            .map_err(db_err)?;
        if updated == 0 {
            return Err(Error::ProductNotFound(id));
        }

        conn.query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
            params![id],
            row_to_product,
        )
        .map_err(db_err)
    }

    /// Delete a product, refusing while any order references it
    pub fn delete_product(&self, id: i64) -> Result<()> {
        let conn = self.conn();

        let ordered: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM order_items WHERE product_id = ?1)",
                params![id],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if ordered {
            return Err(Error::ProductOrdered(id));
        }

        let deleted = conn
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .map_err(db_err)?;
        if deleted == 0 {
            return Err(Error::ProductNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_category() -> (Store, i64) {
        let store = Store::open_in_memory().unwrap();
        let category = store.create_category("Tea", "tea.jpg").unwrap();
        (store, category.id)
    }

    #[test]
    fn test_create_and_get_product() {
        let (store, category) = store_with_category();
        let product = store
            .create_product("Iced Milk Tea", category, "milk-tea.jpg", 30)
            .unwrap();
        assert_eq!(product.name, "Iced Milk Tea");
        assert_eq!(product.sell_count, 0);

        let fetched = store.get_product(product.id).unwrap();
        assert_eq!(fetched.name, product.name);
        assert_eq!(fetched.price, 30);
    }

    #[test]
    fn test_get_missing_product() {
        let (store, _) = store_with_category();
        assert!(matches!(
            store.get_product(42),
            Err(Error::ProductNotFound(42))
        ));
    }

    #[test]
    fn test_create_product_requires_category() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.create_product("Oolong", 7, "oolong.jpg", 25),
            Err(Error::CategoryNotFound(7))
        ));
    }

    #[test]
    fn test_list_products_sorted_by_price() {
        let (store, category) = store_with_category();
        store.create_product("Mid", category, "m.jpg", 20).unwrap();
        store.create_product("Cheap", category, "c.jpg", 10).unwrap();
        store
            .create_product("Pricey", category, "p.jpg", 30)
            .unwrap();

        let asc = store
            .list_products(None, ProductSort::PriceAsc)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect::<Vec<_>>();
        assert_eq!(asc, vec!["Cheap", "Mid", "Pricey"]);

        let desc = store
            .list_products(None, ProductSort::PriceDesc)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect::<Vec<_>>();
        assert_eq!(desc, vec!["Pricey", "Mid", "Cheap"]);
    }

    #[test]
    fn test_list_products_filters_by_category() {
        let (store, tea) = store_with_category();
        let coffee = store.create_category("Coffee", "coffee.jpg").unwrap();
        store.create_product("Sencha", tea, "s.jpg", 20).unwrap();
        store
            .create_product("Espresso", coffee.id, "e.jpg", 25)
            .unwrap();

        let teas = store
            .list_products(Some(tea), ProductSort::Newest)
            .unwrap();
        assert_eq!(teas.len(), 1);
        assert_eq!(teas[0].name, "Sencha");
    }

    #[test]
    fn test_search_products() {
        let (store, category) = store_with_category();
        store
            .create_product("Iced Milk Tea", category, "a.jpg", 30)
            .unwrap();
        store
            .create_product("Hot Black Tea", category, "b.jpg", 25)
            .unwrap();
        store
            .create_product("Espresso", category, "c.jpg", 20)
            .unwrap();

        let hits = store.search_products("tea").unwrap();
        assert_eq!(hits.len(), 2);

        let hits = store.search_products("milk").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Iced Milk Tea");

        assert!(store.search_products("smoothie").unwrap().is_empty());
    }

    #[test]
    fn test_catalog_snapshot_in_id_order() {
        let (store, category) = store_with_category();
        let a = store.create_product("A", category, "a.jpg", 10).unwrap();
        let b = store.create_product("B", category, "b.jpg", 10).unwrap();

        let snapshot = store.catalog_snapshot().unwrap();
        assert_eq!(
            snapshot,
            vec![(a.id, "A".to_string()), (b.id, "B".to_string())]
        );
    }

    #[test]
    fn test_update_product() {
        let (store, category) = store_with_category();
        let product = store
            .create_product("Mlik Tea", category, "m.jpg", 30)
            .unwrap();
        let updated = store
            .update_product(product.id, "Milk Tea", category, "m.jpg", 32)
            .unwrap();
        assert_eq!(updated.name, "Milk Tea");
        assert_eq!(updated.price, 32);
        assert_eq!(updated.date_added, product.date_added);
    }

    #[test]
    fn test_delete_product() {
        let (store, category) = store_with_category();
        let product = store.create_product("Gone", category, "g.jpg", 15).unwrap();
        store.delete_product(product.id).unwrap();
        assert!(matches!(
            store.get_product(product.id),
            Err(Error::ProductNotFound(_))
        ));
        assert!(matches!(
            store.delete_product(product.id),
            Err(Error::ProductNotFound(_))
        ));
    }
}
