use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::Session;
use crate::auth::AuthUser;
use crate::domain::user::{Role, User};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Accepted for compatibility and ignored: new accounts are always clients.
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    pub role: Role,
    pub user_id: i32,
    pub name: String,
    pub email: String,
}

impl From<Session> for TokenResponse {
    fn from(session: Session) -> Self {
        TokenResponse {
            access_token: session.access_token,
            token_type: "bearer".to_string(),
            role: session.user.role,
            user_id: session.user.id,
            name: session.user.name,
            email: session.user.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        MeResponse {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /auth/signup
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created, token issued", body = TokenResponse),
        (status = 400, description = "Invalid input or email already used"),
    ),
    tag = "auth"
)]
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;
    if body.role.as_deref().is_some_and(|r| r != Role::Client.as_str()) {
        log::debug!("ignoring requested role {:?} at signup", body.role);
    }

    let session =
        web::block(move || state.auth.signup(&body.name, &body.email, &body.password)).await??;

    Ok(HttpResponse::Ok().json(TokenResponse::from(session)))
}

/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let session = web::block(move || state.auth.login(&body.email, &body.password)).await??;

    Ok(HttpResponse::Ok().json(TokenResponse::from(session)))
}

/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "The authenticated user", body = MeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists"),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse, AppError> {
    let found = web::block(move || state.auth.me(user.user_id)).await??;
    Ok(HttpResponse::Ok().json(MeResponse::from(found)))
}
