//! # teashop
//!
//! Backend for a small online tea and coffee storefront: product
//! catalog, cart, checkout, order history, an admin back office, and
//! TF-IDF cosine-similarity product recommendations.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install teashop
//! teashop --database ./data/teashop.db --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use teashop::prelude::*;
//!
//! let store = Store::open_in_memory().unwrap();
//! let category = store.create_category("Tea", "tea.jpg").unwrap();
//! store.create_product("Iced Milk Tea", category.id, "a.jpg", 30).unwrap();
//! store.create_product("Iced Milk Coffee", category.id, "b.jpg", 32).unwrap();
//!
//! let catalog = store.catalog_snapshot().unwrap();
//! let similar = recommend(1, &catalog, RECOMMENDATION_LIMIT).unwrap();
//! assert_eq!(similar[0].product_id, 2);
//! ```
//!
//! ## Crate Structure
//!
//! teashop is composed of several crates:
//!
//! - [`teashop-core`](teashop_core) - Domain model, similarity engine, form validation
//! - [`teashop-storage`](teashop_storage) - SQLite-backed repositories
//! - [`teashop-api`](teashop_api) - REST API

// Re-export core types
pub use teashop_core::{
    recommend, CartItem, Category, Contact, Error, FieldError, Order, OrderItem, OrderStatus,
    Product, ProductSort, Result, Role, ScoredProduct, Size, TfidfVectorizer, User, Vector,
    RECOMMENDATION_LIMIT,
};

// Re-export storage
pub use teashop_storage::{DashboardStats, Store};

// Re-export API
pub use teashop_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        recommend, CartItem, Category, Contact, Error, Order, OrderItem, OrderStatus, Product,
        ProductSort, Result, Role, ScoredProduct, Size, Store, User, RECOMMENDATION_LIMIT,
        RestApi,
    };
}
