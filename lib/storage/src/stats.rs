//! Back-office dashboard aggregates

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use teashop_core::Result;

use crate::store::{db_err, Store};

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub revenue_today: i64,
    pub revenue_month: i64,
    pub revenue_year: i64,
    pub total_users: i64,
    pub total_orders: i64,
    pub total_products: i64,
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

impl Store {
    /// Revenue over a half-open `[start, end)` date range, summed over
    /// order items by order date
    fn revenue_between(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        let start = start.and_time(NaiveTime::MIN).and_utc().to_rfc3339();
        let end = end.and_time(NaiveTime::MIN).and_utc().to_rfc3339();

        let conn = self.conn();
        conn.query_row(
            "SELECT COALESCE(SUM(oi.total_price), 0)
             FROM order_items oi
             JOIN orders o ON oi.order_id = o.id
             WHERE o.order_date >= ?1 AND o.order_date < ?2",
            params![start, end],
            |row| row.get(0),
        )
        .map_err(db_err)
    }

    fn count(&self, table: &str) -> Result<i64> {
        let conn = self.conn();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .map_err(db_err)
    }

    pub fn dashboard_stats(&self) -> Result<DashboardStats> {
        let today = Utc::now().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);
        let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        let next_year = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap_or(today);

        Ok(DashboardStats {
            revenue_today: self.revenue_between(today, today.succ_opt().unwrap_or(today))?,
            revenue_month: self.revenue_between(month_start, first_of_next_month(today))?,
            revenue_year: self.revenue_between(year_start, next_year)?,
            total_users: self.count("users")?,
            total_orders: self.count("orders")?,
            total_products: self.count("products")?,
        })
    }
}
