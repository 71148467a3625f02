/// Authentication Routes
///
/// Thin JSON boundary over the credential service: registration, login,
/// token refresh, and current user information.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::service::{self, IssuedCredentials};
use crate::auth::{Claims, ACCESS_TOKEN_TTL_SECS};
use crate::configuration::JwtSettings;
use crate::error::AppError;

/// User registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token refresh request
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Public user view
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

/// Authentication response with access and refresh tokens
#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl From<IssuedCredentials> for AuthResponse {
    fn from(credentials: IssuedCredentials) -> Self {
        Self {
            access_token: credentials.access_token,
            refresh_token: credentials.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: ACCESS_TOKEN_TTL_SECS,
            user: UserResponse {
                id: credentials.user.id,
                username: credentials.user.username,
            },
        }
    }
}

/// POST /api/auth/register
///
/// # Errors
/// - 400: empty field or mismatched passwords
/// - 409: username already exists
/// - 500: internal server error
pub async fn register(
    form: web::Json<RegisterRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let credentials = service::register(
        pool.get_ref(),
        jwt_config.get_ref(),
        &form.username,
        &form.password,
        &form.confirm_password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(credentials)))
}

/// POST /api/auth/login
///
/// # Errors
/// - 400: missing fields
/// - 401: invalid credentials (identical for unknown username and
///   wrong password)
/// - 500: internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let credentials = service::login(
        pool.get_ref(),
        jwt_config.get_ref(),
        &form.username,
        &form.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(credentials)))
}

/// POST /api/auth/refresh
///
/// Rotates the refresh token: the presented token is consumed and a
/// brand-new pair is returned; reusing the old token fails.
///
/// # Errors
/// - 400: missing token
/// - 401: invalid, expired or already-rotated refresh token (one
///   uniform message)
/// - 500: internal server error
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let credentials = service::refresh(
        pool.get_ref(),
        jwt_config.get_ref(),
        &form.refresh_token,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(credentials)))
}

/// GET /api/auth/user
///
/// Requires a valid access token; the middleware verifies it and
/// injects the claims. No credential work happens here.
pub async fn get_current_user(claims: web::ReqData<Claims>) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = service::current_user(user_id, &claims.username);

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id,
        username: user.username,
    }))
}
