//! Request-scoped auth extractors
//!
//! Auth state travels with each request: the session cookie resolves to
//! a user through the session table, and handlers declare what they
//! need in their signature. There is no ambient current-user state.

use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{web, FromRequest, HttpRequest};
use teashop_core::{Error, User};
use teashop_storage::Store;

use crate::response::error_response;

/// Name of the session cookie issued at login
pub const SESSION_COOKIE: &str = "teashop_session";

fn resolve_user(req: &HttpRequest) -> Option<User> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    let store = req.app_data::<web::Data<Arc<Store>>>()?;
    store.session_user(cookie.value()).ok().flatten()
}

/// The authenticated user, if any; never rejects the request
pub struct MaybeUser(pub Option<User>);

impl FromRequest for MaybeUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(resolve_user(req))))
    }
}

/// The authenticated user; rejects with 401 when there is no session
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match resolve_user(req) {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(InternalError::from_response(
                "not authenticated",
                error_response(&Error::NotAuthenticated),
            )
            .into()),
        })
    }
}

/// An authenticated admin; 401 without a session, 403 without the role
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match resolve_user(req) {
            Some(user) if user.is_admin() => Ok(AdminUser(user)),
            Some(_) => Err(
                InternalError::from_response("forbidden", error_response(&Error::Forbidden)).into(),
            ),
            None => Err(InternalError::from_response(
                "not authenticated",
                error_response(&Error::NotAuthenticated),
            )
            .into()),
        })
    }
}
