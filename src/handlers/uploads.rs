use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AdminUser;
use crate::errors::AppError;
use crate::state::AppState;
use crate::uploads::image_extension;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub filename: String,
    /// Public path the image is served from, e.g. `/uploads/images/<name>.png`
    pub url: String,
}

/// Multipart form accepted by the upload endpoint, for the OpenAPI document.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// POST /upload-image
///
/// Stores one image from the multipart field `file`.
#[utoipa::path(
    post,
    path = "/upload-image",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing file, not an image, or too large"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer" = [])),
    tag = "uploads"
)]
pub async fn upload_image(
    state: web::Data<AppState>,
    _admin: AdminUser,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let extension = image_extension(&content_type, filename.as_deref())
            .ok_or_else(|| AppError::BadRequest("Only image files are allowed".to_string()))?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            state.uploads.check_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }

        let stored = state.uploads.save_image(extension, &bytes).await?;
        return Ok(HttpResponse::Ok().json(UploadResponse {
            filename: stored.filename,
            url: stored.url,
        }));
    }

    Err(AppError::BadRequest("Missing 'file' field".to_string()))
}
