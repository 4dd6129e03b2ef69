//! # teashop Storage
//!
//! SQLite-backed storage layer for the teashop storefront.
//!
//! Everything hangs off [`Store`]: one connection behind a mutex, with
//! repository methods grouped by entity:
//!
//! - [`products`] - catalog CRUD, search, the similarity corpus snapshot
//! - [`categories`] - category CRUD with cascading delete
//! - [`users`] - accounts, credentials, roles
//! - [`sessions`] - request-scoped login sessions
//! - [`carts`] - cart lines with option-based merging
//! - [`orders`] - checkout, history, status transitions
//! - [`contacts`] - contact page messages
//! - [`stats`] - admin dashboard aggregates

pub mod carts;
pub mod categories;
pub mod contacts;
pub mod orders;
pub mod products;
pub mod schema;
pub mod sessions;
pub mod stats;
pub mod store;
pub mod users;

pub use stats::DashboardStats;
pub use store::Store;
