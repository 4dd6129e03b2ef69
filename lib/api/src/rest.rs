use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use teashop_storage::Store;

use crate::{admin, auth, storefront};

/// Wire every endpoint onto a service config
///
/// Split out of [`RestApi::start`] so tests can mount the same routing
/// table on an in-memory app.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Storefront
        .route("/home", web::get().to(storefront::home))
        .route("/categories", web::get().to(storefront::list_categories))
        .route("/products", web::get().to(storefront::list_products))
        .route("/products/search", web::post().to(storefront::search_products))
        .route("/products/{id}", web::get().to(storefront::product_details))
        .route("/contact", web::post().to(storefront::submit_contact))
        // Auth
        .route("/auth/register", web::post().to(auth::register))
        .route("/auth/login", web::post().to(auth::login))
        .route("/auth/logout", web::post().to(auth::logout))
        .route("/auth/me", web::get().to(auth::me))
        .route("/auth/profile", web::put().to(auth::update_profile))
        // Cart and checkout
        .route("/cart", web::get().to(storefront::view_cart))
        .route("/cart/items", web::post().to(storefront::add_cart_item))
        .route("/cart/items/{id}", web::delete().to(storefront::remove_cart_item))
        .route("/checkout", web::get().to(storefront::checkout))
        .route("/orders", web::post().to(storefront::submit_order))
        .route("/orders", web::get().to(storefront::order_history))
        .route("/orders/{id}", web::get().to(storefront::order_details))
        // Admin
        .route("/admin/dashboard", web::get().to(admin::dashboard))
        .route("/admin/products", web::post().to(admin::create_product))
        .route("/admin/products/{id}", web::put().to(admin::update_product))
        .route("/admin/products/{id}", web::delete().to(admin::delete_product))
        .route("/admin/categories", web::post().to(admin::create_category))
        .route("/admin/categories/{id}", web::put().to(admin::update_category))
        .route("/admin/categories/{id}", web::delete().to(admin::delete_category))
        .route("/admin/users", web::get().to(admin::list_users))
        .route("/admin/users/{id}", web::delete().to(admin::delete_user))
        .route("/admin/users/{id}/role", web::put().to(admin::update_user_role))
        .route("/admin/orders", web::get().to(admin::list_orders))
        .route("/admin/orders/{id}/status", web::put().to(admin::update_order_status))
        .route("/admin/contacts", web::get().to(admin::list_contacts));
}

pub struct RestApi;

impl RestApi {
    pub async fn start(storage: Arc<Store>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(storage.clone()))
                .configure(routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use teashop_core::Role;

    use crate::extract::SESSION_COOKIE;

    macro_rules! test_app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($storage.clone()))
                    .configure(routes),
            )
            .await
        };
    }

    fn seeded_store() -> Arc<Store> {
        let store = Store::open_in_memory().unwrap();
        let category = store.create_category("Tea", "tea.jpg").unwrap();
        store
            .create_product("Iced Milk Tea", category.id, "a.jpg", 30)
            .unwrap();
        store
            .create_product("Iced Milk Coffee", category.id, "b.jpg", 32)
            .unwrap();
        store
            .create_product("Hot Black Tea", category.id, "c.jpg", 25)
            .unwrap();
        Arc::new(store)
    }

    /// Register a user and hand back a live session cookie for them
    fn session_cookie(storage: &Store) -> Cookie<'static> {
        let user = storage
            .create_user("Tran Anh", "tran@example.com", "0912345678", "secret-password")
            .unwrap();
        let token = storage.create_session(user.id).unwrap();
        Cookie::build(SESSION_COOKIE, token).path("/").finish()
    }

    #[actix_web::test]
    async fn test_register_login_me_flow() {
        let storage = seeded_store();
        let app = test_app!(storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/register")
                .set_json(serde_json::json!({
                    "name": "Tran Anh",
                    "email": "tran@example.com",
                    "phone_number": "0912345678",
                    "password": "secret-password",
                    "confirm_password": "secret-password"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(serde_json::json!({
                    "phone_number": "0912345678",
                    "password": "secret-password"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .next()
            .expect("login sets a session cookie")
            .into_owned();

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/auth/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["phone_number"], "0912345678");
        // The hash never leaves the server
        assert!(body.get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn test_login_with_wrong_password() {
        let storage = seeded_store();
        storage
            .create_user("Tran Anh", "tran@example.com", "0912345678", "secret-password")
            .unwrap();
        let app = test_app!(storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(serde_json::json!({
                    "phone_number": "0912345678",
                    "password": "wrong-password"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_register_validation_failure() {
        let storage = seeded_store();
        let app = test_app!(storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/register")
                .set_json(serde_json::json!({
                    "name": "Ab",
                    "email": "not-an-email",
                    "phone_number": "123",
                    "password": "short",
                    "confirm_password": "short"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["fields"].as_array().unwrap().len() >= 3);
    }

    #[actix_web::test]
    async fn test_product_details_with_recommendations() {
        let storage = seeded_store();
        let app = test_app!(storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/products/1").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;

        assert_eq!(body["product"]["name"], "Iced Milk Tea");
        let similar = body["similar_products"].as_array().unwrap();
        assert_eq!(similar.len(), 2);
        // Shares two terms vs one
        assert_eq!(similar[0]["id"], 2);
        assert_eq!(similar[1]["id"], 3);
    }

    #[actix_web::test]
    async fn test_unknown_product_is_404() {
        let storage = seeded_store();
        let app = test_app!(storage);
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/products/99").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_cart_requires_login() {
        let storage = seeded_store();
        let app = test_app!(storage);
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/cart").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_cart_and_order_flow() {
        let storage = seeded_store();
        let cookie = session_cookie(&storage);
        let app = test_app!(storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/cart/items")
                .cookie(cookie.clone())
                .set_json(serde_json::json!({
                    "product_id": 1,
                    "size": "L",
                    "sugar_level": "50",
                    "ice_level": "100",
                    "quantity": 2
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/cart")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["total"], 70);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .cookie(cookie.clone())
                .set_json(serde_json::json!({
                    "name": "Tran Anh",
                    "phone_number": "0912345678",
                    "city": "Hanoi",
                    "district": "Ba Dinh",
                    "ward": "Cong Vi",
                    "address": "12 Doi Can",
                    "payment_method": "cash"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let order: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(order["total_price"], 70);
        assert_eq!(order["status"], "pending");

        // Cart was emptied by checkout
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/cart")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn test_admin_requires_role() {
        let storage = seeded_store();
        let cookie = session_cookie(&storage);
        let app = test_app!(storage);

        // No session at all
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/admin/dashboard").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Logged in but not admin
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin/dashboard")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // Promoted to admin
        let user = storage.authenticate("0912345678", "secret-password").unwrap();
        storage.update_user_role(user.id, Role::Admin).unwrap();
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_logout_invalidates_session() {
        let storage = seeded_store();
        let cookie = session_cookie(&storage);
        let app = test_app!(storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/logout")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/auth/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
