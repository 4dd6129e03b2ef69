//! Public storefront endpoints: catalog, cart, checkout, orders

use std::str::FromStr;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::{Deserialize, Serialize};
use teashop_core::form::{CartAddForm, CheckoutForm, ContactForm};
use teashop_core::similarity::{recommend, RECOMMENDATION_LIMIT};
use teashop_core::{OrderStatus, Product, ProductSort};
use teashop_storage::Store;

use crate::extract::{CurrentUser, MaybeUser};
use crate::response::{error_response, respond};

/// The product fields a listing or detail page needs
#[derive(Serialize)]
struct ProductSummary {
    id: i64,
    name: String,
    picture: String,
    price: i64,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            picture: product.picture.clone(),
            price: product.price,
        }
    }
}

pub async fn home(
    storage: web::Data<Arc<Store>>,
    user: MaybeUser,
) -> ActixResult<HttpResponse> {
    let top_products = match storage.top_products(5) {
        Ok(products) => products,
        Err(e) => return Ok(error_response(&e)),
    };

    let cart_count = match &user.0 {
        Some(user) => storage.cart_count(user.id).unwrap_or(0),
        None => 0,
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "top_products": top_products,
        "cart_count": cart_count
    })))
}

pub async fn list_categories(storage: web::Data<Arc<Store>>) -> ActixResult<HttpResponse> {
    Ok(respond(storage.list_categories()))
}

#[derive(Deserialize)]
pub struct ListQuery {
    category: Option<i64>,
    sort: Option<String>,
}

pub async fn list_products(
    storage: web::Data<Arc<Store>>,
    query: web::Query<ListQuery>,
) -> ActixResult<HttpResponse> {
    // Unknown sort values fall back to the default ordering
    let sort = query
        .sort
        .as_deref()
        .and_then(|s| ProductSort::from_str(s).ok())
        .unwrap_or_default();

    Ok(respond(storage.list_products(query.category, sort)))
}

#[derive(Deserialize)]
pub struct SearchRequest {
    query: String,
}

pub async fn search_products(
    storage: web::Data<Arc<Store>>,
    req: web::Json<SearchRequest>,
) -> ActixResult<HttpResponse> {
    Ok(respond(storage.search_products(&req.query)))
}

/// Product detail page: the product plus up to five similar products
/// ranked by name similarity over the current catalog
pub async fn product_details(
    storage: web::Data<Arc<Store>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();

    let product = match storage.get_product(id) {
        Ok(product) => product,
        Err(e) => return Ok(error_response(&e)),
    };

    let catalog = match storage.catalog_snapshot() {
        Ok(catalog) => catalog,
        Err(e) => return Ok(error_response(&e)),
    };

    let scored = match recommend(id, &catalog, RECOMMENDATION_LIMIT) {
        Ok(scored) => scored,
        Err(e) => return Ok(error_response(&e)),
    };

    let similar_products: Vec<ProductSummary> = scored
        .iter()
        .filter_map(|s| storage.get_product(s.product_id).ok())
        .map(|p| ProductSummary::from(&p))
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "product": product,
        "similar_products": similar_products
    })))
}

pub async fn submit_contact(
    storage: web::Data<Arc<Store>>,
    form: web::Json<ContactForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    Ok(respond(storage.create_contact(
        &form.name,
        &form.phone_number,
        form.city.as_deref(),
        form.shop.as_deref(),
        &form.title,
        &form.message,
    )))
}

pub async fn add_cart_item(
    storage: web::Data<Arc<Store>>,
    user: CurrentUser,
    form: web::Json<CartAddForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    Ok(respond(storage.add_to_cart(
        user.0.id,
        form.product_id,
        form.size(),
        &form.sugar_level,
        &form.ice_level,
        form.quantity,
    )))
}

fn cart_view(storage: &Store, user_id: i64) -> teashop_core::Result<serde_json::Value> {
    let items = storage.cart_items(user_id)?;
    let total = storage.cart_total(user_id)?;
    Ok(serde_json::json!({
        "items": items,
        "count": items.len(),
        "total": total
    }))
}

pub async fn view_cart(
    storage: web::Data<Arc<Store>>,
    user: CurrentUser,
) -> ActixResult<HttpResponse> {
    Ok(respond(cart_view(&storage, user.0.id)))
}

pub async fn remove_cart_item(
    storage: web::Data<Arc<Store>>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let item_id = path.into_inner();
    match storage.remove_cart_item(user.0.id, item_id) {
        Ok(()) => Ok(respond(cart_view(&storage, user.0.id))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Checkout summary: the cart plus the delivery details on file
pub async fn checkout(
    storage: web::Data<Arc<Store>>,
    user: CurrentUser,
) -> ActixResult<HttpResponse> {
    let items = match storage.cart_items(user.0.id) {
        Ok(items) => items,
        Err(e) => return Ok(error_response(&e)),
    };
    if items.is_empty() {
        return Ok(error_response(&teashop_core::Error::EmptyCart));
    }

    let total = match storage.cart_total(user.0.id) {
        Ok(total) => total,
        Err(e) => return Ok(error_response(&e)),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "items": items,
        "total": total,
        "user": user.0
    })))
}

pub async fn submit_order(
    storage: web::Data<Arc<Store>>,
    user: CurrentUser,
    form: web::Json<CheckoutForm>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = form.validate() {
        return Ok(error_response(&e));
    }

    match storage.submit_order(
        user.0.id,
        &form.name,
        &form.phone_number,
        &form.full_address(),
        form.message.as_deref(),
        &form.payment_method,
    ) {
        Ok(order) => Ok(HttpResponse::Created().json(order)),
        Err(e) => Ok(error_response(&e)),
    }
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    status: Option<String>,
}

pub async fn order_history(
    storage: web::Data<Arc<Store>>,
    user: CurrentUser,
    query: web::Query<HistoryQuery>,
) -> ActixResult<HttpResponse> {
    let status = query
        .status
        .as_deref()
        .and_then(|s| OrderStatus::from_str(s).ok());

    Ok(respond(storage.orders_for_user(user.0.id, status)))
}

/// One order with its items and current product pictures
pub async fn order_details(
    storage: web::Data<Arc<Store>>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let order_id = path.into_inner();

    let order = match storage.get_order(order_id) {
        Ok(order) => order,
        Err(e) => return Ok(error_response(&e)),
    };
    // Customers only see their own orders
    if order.user_id != user.0.id && !user.0.is_admin() {
        return Ok(error_response(&teashop_core::Error::OrderNotFound(
            order_id,
        )));
    }

    let items = match storage.order_items(order_id) {
        Ok(items) => items,
        Err(e) => return Ok(error_response(&e)),
    };

    let pictures: Vec<Option<String>> = items
        .iter()
        .map(|item| {
            storage
                .get_product(item.product_id)
                .ok()
                .map(|p| p.picture)
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "order": order,
        "items": items,
        "pictures": pictures
    })))
}
