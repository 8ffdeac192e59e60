use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::catalogue_service::ProductInput;
use crate::auth::AdminUser;
use crate::domain::catalogue::{Product, ProductChanges, ProductDetails, ProductFilter};
use crate::errors::AppError;
use crate::state::AppState;

use super::brands::BrandResponse;
use super::categories::CategoryResponse;
use super::OkResponse;

// ── Price parsing ────────────────────────────────────────────────────────────

/// Prices arrive either as JSON numbers or as decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

impl RawPrice {
    fn parse(self) -> Result<BigDecimal, String> {
        let text = match self {
            RawPrice::Number(n) => n.to_string(),
            RawPrice::Text(s) => s.trim().to_string(),
        };
        BigDecimal::from_str(&text).map_err(|_| format!("invalid price '{text}'"))
    }
}

fn de_price<'de, D: Deserializer<'de>>(d: D) -> Result<BigDecimal, D::Error> {
    RawPrice::deserialize(d)?.parse().map_err(D::Error::custom)
}

fn de_opt_price<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BigDecimal>, D::Error> {
    Option::<RawPrice>::deserialize(d)?
        .map(RawPrice::parse)
        .transpose()
        .map_err(D::Error::custom)
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    pub category_id: i32,
    pub brand_id: i32,
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
    /// Decimal price, as a number or a string, e.g. "19.99"
    #[serde(deserialize_with = "de_price")]
    #[schema(value_type = String, example = "19.99")]
    pub price: BigDecimal,
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,
    pub image_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de_opt_price")]
    #[schema(value_type = Option<String>, example = "19.99")]
    pub price: Option<BigDecimal>,
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: Option<i32>,
    pub image_path: Option<String>,
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(r: UpdateProductRequest) -> Self {
        ProductChanges {
            category_id: r.category_id,
            brand_id: r.brand_id,
            name: r.name,
            description: r.description,
            price: r.price,
            stock: r.stock,
            image_path: r.image_path,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Only products in this category
    pub category_id: Option<i32>,
    /// Only products of this brand
    pub brand_id: Option<i32>,
    /// Case-insensitive substring of the product name
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub category_id: i32,
    pub brand_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Decimal price with two places, e.g. "19.99"
    pub price: String,
    pub stock: i32,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            category_id: p.category_id,
            brand_id: p.brand_id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            stock: p.stock,
            image_path: p.image_path,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetailsResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub category: CategoryResponse,
    pub brand: BrandResponse,
}

impl From<ProductDetails> for ProductDetailsResponse {
    fn from(d: ProductDetails) -> Self {
        ProductDetailsResponse {
            product: d.product.into(),
            category: d.category.into(),
            brand: d.brand.into(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    params(ProductQuery),
    responses((status = 200, description = "Products with category and brand", body = [ProductDetailsResponse])),
    tag = "catalogue"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let filter = ProductFilter {
        category_id: query.category_id,
        brand_id: query.brand_id,
        search: query.q,
    };

    let rows = web::block(move || state.catalogue.list_products(filter)).await??;
    let body: Vec<ProductDetailsResponse> =
        rows.into_iter().map(ProductDetailsResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductDetailsResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalogue"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let found = web::block(move || state.catalogue.get_product(id)).await??;
    Ok(HttpResponse::Ok().json(ProductDetailsResponse::from(found)))
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid input or unknown category/brand"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer" = [])),
    tag = "catalogue"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    _admin: AdminUser,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;
    let input = ProductInput {
        category_id: body.category_id,
        brand_id: body.brand_id,
        name: body.name,
        description: body.description,
        price: body.price,
        stock: body.stock,
        image_path: body.image_path,
    };

    let created = web::block(move || state.catalogue.create_product(input)).await??;
    Ok(HttpResponse::Created().json(ProductResponse::from(created)))
}

/// PUT /products/{id}
///
/// Partial update: omitted fields keep their current value.
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer" = [])),
    tag = "catalogue"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let updated = web::block(move || state.catalogue.update_product(id, body.into())).await??;
    Ok(HttpResponse::Ok().json(ProductResponse::from(updated)))
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = OkResponse),
        (status = 400, description = "Product has been ordered"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer" = [])),
    tag = "catalogue"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || state.catalogue.delete_product(id)).await??;
    Ok(OkResponse::json())
}
