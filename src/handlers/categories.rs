use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AdminUser;
use crate::domain::catalogue::Category;
use crate::errors::AppError;
use crate::state::AppState;

use super::OkResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Body for creating a category or a brand.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LabelRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1 to 50 characters"))]
    pub name: String,
}

/// Body for renaming a category or a brand; an absent name changes nothing.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LabelUpdateRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1 to 50 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse {
            id: c.id,
            name: c.name,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "All categories", body = [CategoryResponse])),
    tag = "catalogue"
)]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let rows = web::block(move || state.catalogue.list_categories()).await??;
    let body: Vec<CategoryResponse> = rows.into_iter().map(CategoryResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /categories
#[utoipa::path(
    post,
    path = "/categories",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid name"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer" = [])),
    tag = "catalogue"
)]
pub async fn create_category(
    state: web::Data<AppState>,
    _admin: AdminUser,
    body: web::Json<LabelRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let created = web::block(move || state.catalogue.create_category(&body.name)).await??;
    Ok(HttpResponse::Created().json(CategoryResponse::from(created)))
}

/// PUT /categories/{id}
#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    request_body = LabelUpdateRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer" = [])),
    tag = "catalogue"
)]
pub async fn update_category(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<LabelUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let updated =
        web::block(move || state.catalogue.update_category(id, body.name.as_deref())).await??;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(updated)))
}

/// DELETE /categories/{id}
///
/// Refused with 400 while products still reference the category.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = OkResponse),
        (status = 400, description = "Category still has products"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer" = [])),
    tag = "catalogue"
)]
pub async fn delete_category(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || state.catalogue.delete_category(id)).await??;
    Ok(OkResponse::json())
}
