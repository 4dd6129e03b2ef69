//! Back-office endpoints, all behind the admin role

use std::str::FromStr;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use teashop_core::form::{CategoryForm, ProductForm};
use teashop_core::{OrderStatus, Role};
use teashop_storage::Store;

use crate::extract::AdminUser;
use crate::response::{error_response, respond};

pub async fn dashboard(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
) -> ActixResult<HttpResponse> {
    Ok(respond(storage.dashboard_stats()))
}

// Products

pub async fn create_product(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
    form: web::Json<ProductForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    match storage.create_product(&form.name, form.category_id, &form.picture, form.price) {
        Ok(product) => Ok(HttpResponse::Created().json(product)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_product(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
    path: web::Path<i64>,
    form: web::Json<ProductForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    Ok(respond(storage.update_product(
        path.into_inner(),
        &form.name,
        form.category_id,
        &form.picture,
        form.price,
    )))
}

pub async fn delete_product(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    match storage.delete_product(path.into_inner()) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": true }))),
        Err(e) => Ok(error_response(&e)),
    }
}

// Categories

pub async fn create_category(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
    form: web::Json<CategoryForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    match storage.create_category(&form.name, &form.picture) {
        Ok(category) => Ok(HttpResponse::Created().json(category)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_category(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
    path: web::Path<i64>,
    form: web::Json<CategoryForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    Ok(respond(storage.update_category(
        path.into_inner(),
        &form.name,
        &form.picture,
    )))
}

pub async fn delete_category(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    match storage.delete_category(path.into_inner()) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": true }))),
        Err(e) => Ok(error_response(&e)),
    }
}

// Users

pub async fn list_users(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
) -> ActixResult<HttpResponse> {
    Ok(respond(storage.list_users()))
}

pub async fn delete_user(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    match storage.delete_user(path.into_inner()) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": true }))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[derive(Deserialize)]
pub struct RoleRequest {
    role: String,
}

pub async fn update_user_role(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
    path: web::Path<i64>,
    req: web::Json<RoleRequest>,
) -> ActixResult<HttpResponse> {
    let role = match Role::from_str(&req.role) {
        Ok(role) => role,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({ "error": e })));
        }
    };

    Ok(respond(storage.update_user_role(path.into_inner(), role)))
}

// Orders

pub async fn list_orders(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
) -> ActixResult<HttpResponse> {
    Ok(respond(storage.list_orders()))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    status: String,
}

pub async fn update_order_status(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
    path: web::Path<i64>,
    req: web::Json<StatusRequest>,
) -> ActixResult<HttpResponse> {
    let status = match OrderStatus::from_str(&req.status) {
        Ok(status) => status,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({ "error": e })));
        }
    };

    Ok(respond(storage.update_order_status(path.into_inner(), status)))
}

// Contacts

pub async fn list_contacts(
    storage: web::Data<Arc<Store>>,
    _admin: AdminUser,
) -> ActixResult<HttpResponse> {
    Ok(respond(storage.list_contacts()))
}
