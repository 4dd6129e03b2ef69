//! Mapping from domain errors to JSON responses

use actix_web::HttpResponse;
use serde::Serialize;
use teashop_core::{Error, Result};

/// Render a domain error as the matching HTTP status with a JSON body
pub(crate) fn error_response(err: &Error) -> HttpResponse {
    match err {
        Error::ProductNotFound(_)
        | Error::CategoryNotFound(_)
        | Error::UserNotFound(_)
        | Error::OrderNotFound(_)
        | Error::CartItemNotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
            "error": err.to_string()
        })),

        Error::EmailTaken(_)
        | Error::PhoneTaken(_)
        | Error::ProductOrdered(_)
        | Error::InvalidStatusTransition { .. }
        | Error::EmptyCart => HttpResponse::Conflict().json(serde_json::json!({
            "error": err.to_string()
        })),

        Error::InvalidCredentials | Error::NotAuthenticated => {
            HttpResponse::Unauthorized().json(serde_json::json!({
                "error": err.to_string()
            }))
        }

        Error::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
            "error": err.to_string()
        })),

        Error::Validation(fields) => HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "error": "Validation failed",
            "fields": fields
        })),

        Error::Storage(_) | Error::Io(_) => {
            tracing::error!("internal error: {err}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

/// Ok -> 200 with the value as JSON, Err -> mapped error response
pub(crate) fn respond<T: Serialize>(result: Result<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}
