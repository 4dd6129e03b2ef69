use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access level attached to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered customer or administrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    /// Salted hash, never the plain password
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

impl User {
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A product category (tea, coffee, ...) grouping catalog entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub picture: String,
}

/// A catalog entry
///
/// Identity is immutable; name, category, picture and price are
/// admin-editable. `sell_count` is incremented when an order containing
/// this product is marked delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub picture: String,
    pub price: i64,
    pub sell_count: i64,
    pub date_added: DateTime<Utc>,
}

/// Cup size chosen when adding a product to the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    M,
    L,
}

impl Size {
    /// Surcharge added to the unit price for this size
    #[inline]
    #[must_use]
    pub fn surcharge(&self) -> i64 {
        match self {
            Size::M => 0,
            Size::L => 5,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Size::M => "M",
            Size::L => "L",
        }
    }
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Size::M),
            "L" => Ok(Size::L),
            other => Err(format!("unknown size: {other}")),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line in a user's cart
///
/// Lines are keyed by (product, size, sugar, ice); adding the same
/// combination again merges quantities instead of creating a new line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub name: String,
    pub picture: String,
    pub size: Size,
    pub sugar_level: String,
    pub ice_level: String,
    pub quantity: i64,
    pub total_price: i64,
    pub date_added: DateTime<Utc>,
}

impl CartItem {
    /// Options summary carried onto order items ("L - 50 - 100")
    #[must_use]
    pub fn options_summary(&self) -> String {
        format!("{} - {} - {}", self.size, self.sugar_level, self.ice_level)
    }
}

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Only pending orders may move, and only to a terminal state
    #[inline]
    #[must_use]
    pub fn can_transition(&self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Pending, OrderStatus::Delivered)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
        )
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted order with delivery details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub total_price: i64,
    pub message: Option<String>,
    pub payment_method: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// One product line within an order
///
/// Product name and options are copied at checkout time so the order
/// history survives later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub total_price: i64,
    pub options: String,
}

/// A message left through the contact page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub city: Option<String>,
    pub shop: Option<String>,
    pub title: String,
    pub message: String,
}

/// Catalog listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    BestSelling,
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(ProductSort::Newest),
            "price_asc" => Ok(ProductSort::PriceAsc),
            "price_desc" => Ok(ProductSort::PriceDesc),
            "best_selling" => Ok(ProductSort::BestSelling),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Delivered));
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Delivered));
    }

    #[test]
    fn test_size_surcharge() {
        assert_eq!(Size::M.surcharge(), 0);
        assert_eq!(Size::L.surcharge(), 5);
        assert_eq!("L".parse::<Size>().unwrap(), Size::L);
        assert!("XL".parse::<Size>().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }
}
