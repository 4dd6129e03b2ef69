//! # teashop API
//!
//! REST API for the teashop storefront.
//!
//! Handlers are thin: they validate the request form, call into
//! [`teashop_storage::Store`] (and the similarity engine for product
//! details), and map domain errors onto HTTP statuses. Auth state is
//! request-scoped via the extractors in [`extract`].

pub mod admin;
pub mod auth;
pub mod extract;
pub mod response;
pub mod rest;
pub mod storefront;

pub use extract::{AdminUser, CurrentUser, MaybeUser, SESSION_COOKIE};
pub use rest::RestApi;
