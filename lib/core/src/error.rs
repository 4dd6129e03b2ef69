use thiserror::Error;

use crate::form::FieldError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Cart item not found: {0}")]
    CartItemNotFound(i64),

    #[error("Email already in use: {0}")]
    EmailTaken(String),

    #[error("Phone number already in use: {0}")]
    PhoneTaken(String),

    #[error("Invalid phone number or password")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Product has been ordered and cannot be deleted: {0}")]
    ProductOrdered(i64),

    #[error("Invalid order status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
