pub mod admin;
pub mod auth;
pub mod brands;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod uploads;

use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by delete endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn json() -> HttpResponse {
        HttpResponse::Ok().json(OkResponse { ok: true })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "service"
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Registers every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(
            web::scope("/auth")
                .route("/signup", web::post().to(auth::signup))
                .route("/login", web::post().to(auth::login))
                .route("/me", web::get().to(auth::me)),
        )
        .service(
            web::scope("/categories")
                .route("", web::get().to(categories::list_categories))
                .route("", web::post().to(categories::create_category))
                .route("/{id}", web::put().to(categories::update_category))
                .route("/{id}", web::delete().to(categories::delete_category)),
        )
        .service(
            web::scope("/brands")
                .route("", web::get().to(brands::list_brands))
                .route("", web::post().to(brands::create_brand))
                .route("/{id}", web::put().to(brands::update_brand))
                .route("/{id}", web::delete().to(brands::delete_brand)),
        )
        .service(
            web::scope("/products")
                .route("", web::get().to(products::list_products))
                .route("", web::post().to(products::create_product))
                .route("/{id}", web::get().to(products::get_product))
                .route("/{id}", web::put().to(products::update_product))
                .route("/{id}", web::delete().to(products::delete_product)),
        )
        .route("/upload-image", web::post().to(uploads::upload_image))
        .service(
            web::scope("/cart")
                .route("", web::get().to(cart::get_cart))
                .route("/add", web::post().to(cart::add_to_cart))
                .route("/clear", web::post().to(cart::clear_cart))
                .route("/items/{product_id}", web::put().to(cart::set_quantity))
                .route("/items/{product_id}", web::delete().to(cart::remove_item)),
        )
        .service(
            web::scope("/orders")
                .route("", web::post().to(orders::checkout))
                .route("", web::get().to(orders::list_orders))
                .route("/{id}", web::get().to(orders::get_order))
                .route("/{id}/status", web::put().to(orders::update_status)),
        )
        .service(
            web::scope("/admin")
                .route("/users", web::get().to(admin::list_users))
                .route("/carts", web::get().to(admin::list_carts))
                .route("/stats", web::get().to(admin::stats)),
        );
}
