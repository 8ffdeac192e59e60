use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::order_service::DEFAULT_PAGE_SIZE;
use crate::auth::{AdminUser, AuthUser};
use crate::domain::order::{Checkout, OrderLineView, OrderStatus};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    /// Price per unit at the time of purchase
    pub unit_price: String,
    pub line_total: String,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(l: OrderLineView) -> Self {
        OrderLineResponse {
            line_total: l.line_total().to_string(),
            id: l.id,
            user_id: l.user_id,
            product_id: l.product_id,
            product_name: l.product_name,
            quantity: l.quantity,
            unit_price: l.unit_price.to_string(),
            status: l.status,
            ordered_at: l.ordered_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub user_id: i32,
    pub items: Vec<OrderLineResponse>,
    pub total: String,
    pub created_at: DateTime<Utc>,
}

impl From<Checkout> for CheckoutResponse {
    fn from(c: Checkout) -> Self {
        CheckoutResponse {
            total: c.total().to_string(),
            user_id: c.user_id,
            items: c.lines.into_iter().map(OrderLineResponse::from).collect(),
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Only lines with this status
    pub status: Option<OrderStatus>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderLineResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Checks out the caller's cart. Stock is verified and decremented, one
/// pending order line is written per product and the cart is emptied, all
/// inside a single database transaction.
#[utoipa::path(
    post,
    path = "/orders",
    responses(
        (status = 201, description = "Order lines created", body = CheckoutResponse),
        (status = 400, description = "Cart is empty or stock is insufficient"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let result = web::block(move || state.orders.checkout(user.user_id)).await??;
    Ok(HttpResponse::Created().json(CheckoutResponse::from(result)))
}

/// GET /orders
///
/// Admins see every user's order lines, clients only their own. Newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated order lines", body = ListOrdersResponse),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let result = web::block(move || {
        state
            .orders
            .list_for(user, params.status, params.page, params.limit)
    })
    .await??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderLineResponse::from).collect(),
        total: result.total,
        page: result.page,
        limit: result.limit,
    }))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i32, Path, description = "Order line id")),
    responses(
        (status = 200, description = "Order line found", body = OrderLineResponse),
        (status = 403, description = "Line belongs to another user"),
        (status = 404, description = "Order line not found"),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let line = web::block(move || state.orders.get_for(user, id)).await??;
    Ok(HttpResponse::Ok().json(OrderLineResponse::from(line)))
}

/// PUT /orders/{id}/status
///
/// Pending lines can be completed or canceled; both are final.
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(("id" = i32, Path, description = "Order line id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderLineResponse),
        (status = 400, description = "Unknown status or transition not allowed"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Order line not found"),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn update_status(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status: OrderStatus = body.status.trim().to_lowercase().parse()?;

    let line = web::block(move || state.orders.update_status(id, status)).await??;
    Ok(HttpResponse::Ok().json(OrderLineResponse::from(line)))
}
