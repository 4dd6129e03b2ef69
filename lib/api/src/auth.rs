//! Registration, login and profile endpoints

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use teashop_core::form::{LoginForm, ProfileForm, RegisterForm};
use teashop_storage::Store;

use crate::extract::{CurrentUser, SESSION_COOKIE};
use crate::response::error_response;

pub async fn register(
    storage: web::Data<Arc<Store>>,
    form: web::Json<RegisterForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    match storage.create_user(&form.name, &form.email, &form.phone_number, &form.password) {
        Ok(user) => Ok(HttpResponse::Created().json(user)),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Verify credentials and issue a session cookie
pub async fn login(
    storage: web::Data<Arc<Store>>,
    form: web::Json<LoginForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    let user = match storage.authenticate(&form.phone_number, &form.password) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    let token = match storage.create_session(user.id) {
        Ok(token) => token,
        Err(e) => return Ok(error_response(&e)),
    };

    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(user))
}

/// Drop the session and clear the cookie
pub async fn logout(
    storage: web::Data<Arc<Store>>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Err(e) = storage.delete_session(cookie.value()) {
            return Ok(error_response(&e));
        }
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();

    Ok(HttpResponse::Ok().cookie(removal).json(serde_json::json!({
        "result": true
    })))
}

pub async fn me(user: CurrentUser) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(user.0))
}

pub async fn update_profile(
    storage: web::Data<Arc<Store>>,
    user: CurrentUser,
    form: web::Json<ProfileForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    match storage.update_profile(user.0.id, &form.name, &form.email, &form.phone_number) {
        Ok(updated) => Ok(HttpResponse::Ok().json(updated)),
        Err(e) => Ok(error_response(&e)),
    }
}
