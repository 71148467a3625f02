/// Credential Service
///
/// Orchestrates the password hasher, token issuer, refresh-token
/// manager and credential store into the register / login / refresh /
/// current-user operations. This is the only module that talks to more
/// than one of those collaborators.

use sqlx::PgPool;

use crate::auth::jwt::issue_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::refresh_token::{generate_refresh_token, store_refresh_token, validate_and_consume, ConsumeError};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, DatabaseError, ValidationError};
use crate::store;

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct UserView {
    pub id: i32,
    pub username: String,
}

/// Result of a successful register / login / refresh operation.
#[derive(Debug)]
pub struct IssuedCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserView,
}

/// Register a new user and issue its first token pair.
///
/// The existence pre-check gives the common case a clean `Conflict`;
/// the unique index on `username` adjudicates the check-then-insert
/// race, and a constraint violation from the insert surfaces as
/// `Conflict` as well.
pub async fn register(
    pool: &PgPool,
    jwt_config: &JwtSettings,
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<IssuedCredentials, AppError> {
    validate_registration(username, password, confirm_password)?;

    if store::username_exists(pool, username).await? {
        return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
            "username already exists".to_string(),
        )));
    }

    let password_hash = hash_password(password)?;
    let user_id = store::insert_user(pool, username, &password_hash).await?;

    tracing::info!(user_id = user_id, "User registered");

    issue_pair(pool, jwt_config, user_id, username).await
}

/// Authenticate a user by username and password.
///
/// Unknown username and wrong password are indistinguishable to the
/// caller (enumeration defense).
pub async fn login(
    pool: &PgPool,
    jwt_config: &JwtSettings,
    username: &str,
    password: &str,
) -> Result<IssuedCredentials, AppError> {
    if username.is_empty() {
        return Err(ValidationError::EmptyField("username".to_string()).into());
    }
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()).into());
    }

    let user = store::find_user_by_username(pool, username)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    tracing::info!(user_id = user.id, "User logged in");

    issue_pair(pool, jwt_config, user.id, &user.username).await
}

/// Rotate a refresh token: consume the old one and issue a fresh pair.
///
/// Every consume failure (not found, expired, orphaned) maps to the
/// same external rejection; the distinction is only logged.
pub async fn refresh(
    pool: &PgPool,
    jwt_config: &JwtSettings,
    refresh_token: &str,
) -> Result<IssuedCredentials, AppError> {
    if refresh_token.is_empty() {
        return Err(ValidationError::EmptyField("refresh_token".to_string()).into());
    }

    let (user_id, username) = match validate_and_consume(pool, refresh_token).await {
        Ok(identity) => identity,
        Err(ConsumeError::Store(e)) => return Err(e),
        Err(reason) => {
            tracing::warn!(reason = ?reason, "Refresh token rejected");
            return Err(AppError::Auth(AuthError::InvalidRefreshToken));
        }
    };

    tracing::info!(user_id = user_id, "Refresh token rotated");

    issue_pair(pool, jwt_config, user_id, &username).await
}

/// Return the public view for an identity already verified by the
/// boundary's access-token check. Performs no credential work.
pub fn current_user(user_id: i32, username: &str) -> UserView {
    UserView {
        id: user_id,
        username: username.to_string(),
    }
}

/// Issue an access token plus a stored refresh token for a user.
async fn issue_pair(
    pool: &PgPool,
    jwt_config: &JwtSettings,
    user_id: i32,
    username: &str,
) -> Result<IssuedCredentials, AppError> {
    let access_token = issue_access_token(user_id, username, jwt_config)?;
    let refresh_token = generate_refresh_token()?;
    store_refresh_token(pool, user_id, &refresh_token).await?;

    Ok(IssuedCredentials {
        access_token,
        refresh_token,
        user: UserView {
            id: user_id,
            username: username.to_string(),
        },
    })
}

fn validate_registration(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), AppError> {
    if username.is_empty() {
        return Err(ValidationError::EmptyField("username".to_string()).into());
    }
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()).into());
    }
    if confirm_password.is_empty() {
        return Err(ValidationError::EmptyField("confirm_password".to_string()).into());
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch.into());
    }
    Ok(())
}
