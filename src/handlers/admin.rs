use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AdminUser;
use crate::domain::ports::Stats;
use crate::domain::user::{Role, User};
use crate::errors::AppError;
use crate::state::AppState;

use super::cart::CartResponse;

/// A user account without its password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub products: i64,
    pub categories: i64,
    pub brands: i64,
    pub users: i64,
    pub carts: i64,
    pub order_lines: i64,
    pub pending_order_lines: i64,
    /// Sum of completed line totals
    pub revenue: String,
}

impl From<Stats> for StatsResponse {
    fn from(s: Stats) -> Self {
        StatsResponse {
            products: s.products,
            categories: s.categories,
            brands: s.brands,
            users: s.users,
            carts: s.carts,
            order_lines: s.order_lines,
            pending_order_lines: s.pending_order_lines,
            revenue: s.revenue.with_scale(2).to_string(),
        }
    }
}

/// GET /admin/users
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "Every user account", body = [UserResponse]),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_users(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let users = web::block(move || state.admin.users()).await??;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /admin/carts
#[utoipa::path(
    get,
    path = "/admin/carts",
    responses(
        (status = 200, description = "Every cart with its items and totals", body = [CartResponse]),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_carts(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let carts = web::block(move || state.carts.list_all()).await??;
    let body: Vec<CartResponse> = carts.into_iter().map(CartResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /admin/stats
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Store counters and revenue", body = StatsResponse),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn stats(state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
    let stats = web::block(move || state.admin.stats()).await??;
    Ok(HttpResponse::Ok().json(StatsResponse::from(stats)))
}
