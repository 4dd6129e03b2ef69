//! # teashop Core
//!
//! Core library for the teashop storefront backend.
//!
//! This crate provides the domain model and the pieces of logic that are
//! independent of storage and HTTP:
//!
//! - [`model`] - Products, categories, users, carts, orders
//! - [`similarity`] - TF-IDF cosine-similarity product recommendations
//! - [`form`] - Typed request forms with per-field validators
//! - [`password`] - Salted password hashing
//!
//! ## Example
//!
//! ```rust
//! use teashop_core::similarity::{recommend, RECOMMENDATION_LIMIT};
//!
//! let catalog = vec![
//!     (1, "Iced Milk Tea".to_string()),
//!     (2, "Iced Milk Coffee".to_string()),
//!     (3, "Hot Black Tea".to_string()),
//! ];
//!
//! let similar = recommend(1, &catalog, RECOMMENDATION_LIMIT).unwrap();
//! assert_eq!(similar[0].product_id, 2);
//! ```

pub mod error;
pub mod form;
pub mod model;
pub mod password;
pub mod similarity;
pub mod vector;

pub use error::{Error, Result};
pub use form::{FieldError, FormErrors};
pub use model::{
    CartItem, Category, Contact, Order, OrderItem, OrderStatus, Product, ProductSort, Role, Size,
    User,
};
pub use similarity::{recommend, ScoredProduct, TfidfVectorizer, RECOMMENDATION_LIMIT};
pub use vector::Vector;
