use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AdminUser;
use crate::domain::catalogue::Brand;
use crate::errors::AppError;
use crate::state::AppState;

use super::categories::{LabelRequest, LabelUpdateRequest};
use super::OkResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct BrandResponse {
    pub id: i32,
    pub name: String,
}

impl From<Brand> for BrandResponse {
    fn from(b: Brand) -> Self {
        BrandResponse {
            id: b.id,
            name: b.name,
        }
    }
}

/// GET /brands
#[utoipa::path(
    get,
    path = "/brands",
    responses((status = 200, description = "All brands", body = [BrandResponse])),
    tag = "catalogue"
)]
pub async fn list_brands(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let rows = web::block(move || state.catalogue.list_brands()).await??;
    let body: Vec<BrandResponse> = rows.into_iter().map(BrandResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /brands
#[utoipa::path(
    post,
    path = "/brands",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Brand created", body = BrandResponse),
        (status = 400, description = "Invalid name"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer" = [])),
    tag = "catalogue"
)]
pub async fn create_brand(
    state: web::Data<AppState>,
    _admin: AdminUser,
    body: web::Json<LabelRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let created = web::block(move || state.catalogue.create_brand(&body.name)).await??;
    Ok(HttpResponse::Created().json(BrandResponse::from(created)))
}

/// PUT /brands/{id}
#[utoipa::path(
    put,
    path = "/brands/{id}",
    params(("id" = i32, Path, description = "Brand id")),
    request_body = LabelUpdateRequest,
    responses(
        (status = 200, description = "Brand updated", body = BrandResponse),
        (status = 404, description = "Brand not found"),
    ),
    security(("bearer" = [])),
    tag = "catalogue"
)]
pub async fn update_brand(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<LabelUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let updated =
        web::block(move || state.catalogue.update_brand(id, body.name.as_deref())).await??;
    Ok(HttpResponse::Ok().json(BrandResponse::from(updated)))
}

/// DELETE /brands/{id}
#[utoipa::path(
    delete,
    path = "/brands/{id}",
    params(("id" = i32, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand deleted", body = OkResponse),
        (status = 400, description = "Brand still has products"),
        (status = 404, description = "Brand not found"),
    ),
    security(("bearer" = [])),
    tag = "catalogue"
)]
pub async fn delete_brand(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || state.catalogue.delete_brand(id)).await??;
    Ok(OkResponse::json())
}
