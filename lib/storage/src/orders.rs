//! Order repository

use std::str::FromStr;

use chrono::Utc;
use rusqlite::{params, Row};
use teashop_core::{Error, Order, OrderItem, OrderStatus, Result};

use crate::store::{db_err, parse_timestamp, Store};

const ORDER_COLUMNS: &str = "id, user_id, name, phone_number, address, total_price, message, \
                             payment_method, order_date, status";

fn row_to_order(row: &Row<'_>) -> rusqlite::Result<Order> {
    let status: String = row.get(9)?;
    Ok(Order {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        phone_number: row.get(3)?,
        address: row.get(4)?,
        total_price: row.get(5)?,
        message: row.get(6)?,
        payment_method: row.get(7)?,
        order_date: parse_timestamp(&row.get::<_, String>(8)?),
        status: OrderStatus::from_str(&status).unwrap_or(OrderStatus::Pending),
    })
}

fn row_to_order_item(row: &Row<'_>) -> rusqlite::Result<OrderItem> {
    Ok(OrderItem {
        id: row.get(0)?,
        order_id: row.get(1)?,
        product_id: row.get(2)?,
        product_name: row.get(3)?,
        quantity: row.get(4)?,
        total_price: row.get(5)?,
        options: row.get(6)?,
    })
}

impl Store {
    /// Turn the user's cart into an order
    ///
    /// Order and items are written and the cart cleared in a single
    /// transaction; the order total is the sum of the cart line totals.
    pub fn submit_order(
        &self,
        user_id: i64,
        name: &str,
        phone_number: &str,
        address: &str,
        message: Option<&str>,
        payment_method: &str,
    ) -> Result<Order> {
        let mut conn = self.conn();
        let tx = conn.transaction().map_err(db_err)?;

        struct Line {
            product_id: i64,
            name: String,
            size: String,
            sugar_level: String,
            ice_level: String,
            quantity: i64,
            total_price: i64,
        }

        let lines: Vec<Line> = {
            let mut stmt = tx
                .prepare(
                    "SELECT product_id, name, size, sugar_level, ice_level, quantity, total_price
                     FROM cart_items WHERE user_id = ?1 ORDER BY id ASC",
                )
                .map_err(db_err)?;
            let rows = stmt
                .query_map(params![user_id], |row| {
                    Ok(Line {
                        product_id: row.get(0)?,
                        name: row.get(1)?,
                        size: row.get(2)?,
                        sugar_level: row.get(3)?,
                        ice_level: row.get(4)?,
                        quantity: row.get(5)?,
                        total_price: row.get(6)?,
                    })
                })
                .map_err(db_err)?;

            let mut lines = Vec::new();
            for row in rows {
                lines.push(row.map_err(db_err)?);
            }
            lines
        };

        if lines.is_empty() {
            return Err(Error::EmptyCart);
        }

        let total: i64 = lines.iter().map(|line| line.total_price).sum();
        let order_date = Utc::now();

        tx.execute(
            "INSERT INTO orders (user_id, name, phone_number, address, total_price, message,
             payment_method, order_date, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'pending')",
            params![
                user_id,
                name,
                phone_number,
                address,
                total,
                message,
                payment_method,
                order_date.to_rfc3339()
            ],
        )
        .map_err(db_err)?;
        let order_id = tx.last_insert_rowid();

        for line in &lines {
            let options = format!("{} - {} - {}", line.size, line.sugar_level, line.ice_level);
            tx.execute(
                "INSERT INTO order_items (order_id, product_id, product_name, quantity,
                 total_price, options)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    order_id,
                    line.product_id,
                    line.name,
                    line.quantity,
                    line.total_price,
                    options
                ],
            )
            .map_err(db_err)?;
        }

        tx.execute("DELETE FROM cart_items WHERE user_id = ?1", params![user_id])
            .map_err(db_err)?;
        tx.commit().map_err(db_err)?;

        Ok(Order {
            id: order_id,
            user_id,
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            address: address.to_string(),
            total_price: total,
            message: message.map(str::to_string),
            payment_method: payment_method.to_string(),
            order_date,
            status: OrderStatus::Pending,
        })
    }

    pub fn get_order(&self, id: i64) -> Result<Order> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"),
            params![id],
            row_to_order,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Error::OrderNotFound(id),
            other => db_err(other),
        })
    }

    pub fn order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, order_id, product_id, product_name, quantity, total_price, options
                 FROM order_items WHERE order_id = ?1 ORDER BY id ASC",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![order_id], row_to_order_item)
            .map_err(db_err)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row.map_err(db_err)?);
        }
        Ok(items)
    }

    /// A user's order history, optionally narrowed to one status
    pub fn orders_for_user(
        &self,
        user_id: i64,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>> {
        let conn = self.conn();
        let mut orders = Vec::new();
        match status {
            Some(status) => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {ORDER_COLUMNS} FROM orders
                         WHERE user_id = ?1 AND status = ?2 ORDER BY id DESC"
                    ))
                    .map_err(db_err)?;
                let rows = stmt
                    .query_map(params![user_id, status.as_str()], row_to_order)
                    .map_err(db_err)?;
                for row in rows {
                    orders.push(row.map_err(db_err)?);
                }
            }
            None => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY id DESC"
                    ))
                    .map_err(db_err)?;
                let rows = stmt
                    .query_map(params![user_id], row_to_order)
                    .map_err(db_err)?;
                for row in rows {
                    orders.push(row.map_err(db_err)?);
                }
            }
        }
        Ok(orders)
    }

    /// Every order in the system, for the back office
    pub fn list_orders(&self) -> Result<Vec<Order>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders ORDER BY id DESC"
            ))
            .map_err(db_err)?;
        let rows = stmt.query_map([], row_to_order).map_err(db_err)?;

        let mut orders = Vec::new();
        for row in rows {
            orders.push(row.map_err(db_err)?);
        }
        Ok(orders)
    }

    /// Move an order to a new status
    ///
    /// Only pending orders may move. Delivery bumps each ordered
    /// product's sell count in the same transaction.
    pub fn update_order_status(&self, order_id: i64, new_status: OrderStatus) -> Result<Order> {
        let mut conn = self.conn();
        let tx = conn.transaction().map_err(db_err)?;

        let mut order = tx
            .query_row(
                &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"),
                params![order_id],
                row_to_order,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::OrderNotFound(order_id),
                other => db_err(other),
            })?;

        if !order.status.can_transition(new_status) {
            return Err(Error::InvalidStatusTransition {
                from: order.status.to_string(),
                to: new_status.to_string(),
            });
        }

        tx.execute(
            "UPDATE orders SET status = ?1 WHERE id = ?2",
            params![new_status.as_str(), order_id],
        )
        .map_err(db_err)?;

        if new_status == OrderStatus::Delivered {
            tx.execute(
                "UPDATE products SET sell_count = sell_count + (
                     SELECT COALESCE(SUM(quantity), 0) FROM order_items
                     WHERE order_id = ?1 AND product_id = products.id
                 )
                 WHERE id IN (SELECT product_id FROM order_items WHERE order_id = ?1)",
                params![order_id],
            )
            .map_err(db_err)?;
        }

        tx.commit().map_err(db_err)?;
        order.status = new_status;
        Ok(order)
    }
}
