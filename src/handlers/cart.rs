use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::domain::cart::{CartLine, CartView};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: i32,
    /// Defaults to 1.
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetQuantityRequest {
    /// 0 removes the line.
    #[validate(range(min = 0, max = 10000, message = "Quantity must be between 0 and 10000"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub product_id: i32,
    pub name: String,
    pub unit_price: String,
    pub quantity: i32,
    pub line_total: String,
}

impl From<CartLine> for CartItemResponse {
    fn from(line: CartLine) -> Self {
        CartItemResponse {
            line_total: line.line_total().to_string(),
            product_id: line.product_id,
            name: line.product_name,
            unit_price: line.unit_price.to_string(),
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub cart_id: i32,
    pub user_id: i32,
    pub items: Vec<CartItemResponse>,
    pub item_count: i64,
    pub total: String,
}

impl From<CartView> for CartResponse {
    fn from(cart: CartView) -> Self {
        CartResponse {
            item_count: cart.item_count(),
            total: cart.total().to_string(),
            cart_id: cart.id,
            user_id: cart.user_id,
            items: cart.lines.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
///
/// The caller's cart, created on first access.
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "The caller's cart", body = CartResponse),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn get_cart(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse, AppError> {
    let cart = web::block(move || state.carts.get(user.user_id)).await??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// POST /cart/add
///
/// Adding a product already in the cart increases its quantity.
#[utoipa::path(
    post,
    path = "/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let cart =
        web::block(move || state.carts.add(user.user_id, body.product_id, body.quantity)).await??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// PUT /cart/items/{product_id}
#[utoipa::path(
    put,
    path = "/cart/items/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Product is not in the cart"),
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn set_quantity(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<SetQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let cart = web::block(move || state.carts.set_quantity(user.user_id, product_id, body.quantity))
        .await??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// DELETE /cart/items/{product_id}
#[utoipa::path(
    delete,
    path = "/cart/items/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Product is not in the cart"),
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let cart = web::block(move || state.carts.remove(user.user_id, product_id)).await??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// POST /cart/clear
#[utoipa::path(
    post,
    path = "/cart/clear",
    responses((status = 200, description = "The emptied cart", body = CartResponse)),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let cart = web::block(move || state.carts.clear(user.user_id)).await??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::Utc;

    use super::*;

    #[test]
    fn quantity_defaults_to_one() {
        let body: AddToCartRequest = serde_json::from_str(r#"{"product_id": 3}"#).unwrap();
        assert_eq!(body.quantity, 1);
        assert!(body.validate().is_ok());

        let zero: AddToCartRequest =
            serde_json::from_str(r#"{"product_id": 3, "quantity": 0}"#).unwrap();
        assert!(zero.validate().is_err());
    }

    #[test]
    fn cart_response_carries_totals() {
        let cart = CartView {
            id: 4,
            user_id: 9,
            created_at: Utc::now(),
            lines: vec![CartLine {
                product_id: 1,
                product_name: "Headphones".to_string(),
                unit_price: BigDecimal::from_str("19.99").unwrap(),
                quantity: 2,
                updated_at: Utc::now(),
            }],
        };

        let json = serde_json::to_value(CartResponse::from(cart)).unwrap();

        assert_eq!(json["cart_id"], 4);
        assert_eq!(json["item_count"], 2);
        assert_eq!(json["total"], "39.98");
        assert_eq!(json["items"][0]["name"], "Headphones");
        assert_eq!(json["items"][0]["line_total"], "39.98");
    }
}
