//! Typed request forms with per-field validators
//!
//! Every mutating endpoint deserializes into one of these structs; the
//! fields are fixed and typed, and each form attaches its validators in
//! `validate`. Failures come back as a list of (field, message) pairs.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Size;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

fn digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"))
}

/// A single failed field validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulates field validation failures for one form
#[derive(Debug, Default)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Non-empty after trimming; returns whether the value was present
    pub fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.push(field, "is required");
            false
        } else {
            true
        }
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize) {
        if self.require(field, value) && value.chars().count() < min {
            self.push(field, format!("must be at least {min} characters"));
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.require(field, value) && !email_regex().is_match(value) {
            self.push(field, "is not a valid email address");
        }
    }

    /// Exactly `len` characters, digits only
    pub fn exact_digits(&mut self, field: &str, value: &str, len: usize) {
        if !self.require(field, value) {
            return;
        }
        if value.chars().count() != len {
            self.push(field, format!("must be exactly {len} characters"));
        } else if !digits_regex().is_match(value) {
            self.push(field, "must contain digits only");
        }
    }

    pub fn equal(&mut self, field: &str, value: &str, other: &str, message: &str) {
        if value != other {
            self.push(field, message);
        }
    }

    pub fn positive(&mut self, field: &str, value: i64) {
        if value <= 0 {
            self.push(field, "must be positive");
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

/// Account registration
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::default();
        errors.min_len("name", &self.name, 3);
        errors.email("email", &self.email);
        errors.exact_digits("phone_number", &self.phone_number, 10);
        errors.min_len("password", &self.password, 8);
        errors.equal(
            "confirm_password",
            &self.confirm_password,
            &self.password,
            "does not match password",
        );
        errors.finish()
    }
}

/// Login credentials (phone number is the account identifier)
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub phone_number: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::default();
        errors.require("phone_number", &self.phone_number);
        errors.require("password", &self.password);
        errors.finish()
    }
}

/// Profile update
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::default();
        errors.min_len("name", &self.name, 3);
        errors.email("email", &self.email);
        errors.exact_digits("phone_number", &self.phone_number, 10);
        errors.finish()
    }
}

/// Contact page message
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub phone_number: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub shop: Option<String>,
    pub title: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::default();
        errors.require("name", &self.name);
        errors.exact_digits("phone_number", &self.phone_number, 10);
        errors.require("title", &self.title);
        errors.require("message", &self.message);
        errors.finish()
    }
}

/// Add-to-cart request
#[derive(Debug, Clone, Deserialize)]
pub struct CartAddForm {
    pub product_id: i64,
    pub size: String,
    pub sugar_level: String,
    pub ice_level: String,
    pub quantity: i64,
}

impl CartAddForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::default();
        errors.positive("product_id", self.product_id);
        if Size::from_str(&self.size).is_err() {
            errors.push("size", "must be M or L");
        }
        errors.require("sugar_level", &self.sugar_level);
        errors.require("ice_level", &self.ice_level);
        errors.positive("quantity", self.quantity);
        errors.finish()
    }

    /// The validated size; call after `validate` succeeded
    pub fn size(&self) -> Size {
        Size::from_str(&self.size).unwrap_or(Size::M)
    }
}

/// Checkout delivery details
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub phone_number: String,
    pub city: String,
    pub district: String,
    pub ward: String,
    pub address: String,
    #[serde(default)]
    pub message: Option<String>,
    pub payment_method: String,
}

impl CheckoutForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::default();
        errors.require("name", &self.name);
        errors.exact_digits("phone_number", &self.phone_number, 10);
        errors.require("city", &self.city);
        errors.require("district", &self.district);
        errors.require("ward", &self.ward);
        errors.require("address", &self.address);
        errors.require("payment_method", &self.payment_method);
        errors.finish()
    }

    /// Delivery address joined the way orders store it
    #[must_use]
    pub fn full_address(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.city, self.district, self.ward, self.address
        )
    }
}

/// Admin product create/update
#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub category_id: i64,
    pub picture: String,
    pub price: i64,
}

impl ProductForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::default();
        errors.require("name", &self.name);
        errors.positive("category_id", self.category_id);
        errors.require("picture", &self.picture);
        errors.positive("price", self.price);
        errors.finish()
    }
}

/// Admin category create/update
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub picture: String,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::default();
        errors.require("name", &self.name);
        errors.require("picture", &self.picture);
        errors.finish()
    }
}
