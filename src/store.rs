/// Credential Store
///
/// The only module that talks to Postgres. Holds the users and
/// refresh_tokens queries; uniqueness is enforced by the database
/// (unique indexes on `username` and `token_hash`), not by application
/// locks.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;

/// A persisted user row. The password hash stays inside the crate and is
/// never serialized outward.
#[derive(Debug, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert a new user and return its generated id.
///
/// A concurrent insert of the same username loses to the unique index;
/// the resulting 23505 is mapped to the conflict taxonomy by
/// `From<sqlx::Error>`.
pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<i32, AppError> {
    let now = Utc::now();
    let user_id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO users (username, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user_id)
}

/// Existence pre-check used by registration. An optimization only; the
/// unique index remains the authoritative guard.
pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)",
    )
    .bind(username)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Look up a user by username (case-sensitive).
pub async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, created_at, updated_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Resolve the username owning a refresh token record.
pub async fn find_username_by_id(pool: &PgPool, user_id: i32) -> Result<Option<String>, AppError> {
    let username = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(username)
}

/// Insert a refresh token record. Only the digest is stored.
pub async fn insert_refresh_token(
    pool: &PgPool,
    user_id: i32,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, token_hash, expires_at, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Atomically remove a refresh token record by digest and return its
/// owner and expiry.
///
/// Refresh tokens are single-use: the delete and the lookup are one
/// statement, so concurrent attempts with the same token yield exactly
/// one `Some` and the rest `None`. Returns `None` when no record
/// matches (forged or already rotated).
pub async fn consume_refresh_token(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<(i32, DateTime<Utc>)>, AppError> {
    let record = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
        r#"
        DELETE FROM refresh_tokens
        WHERE token_hash = $1
        RETURNING user_id, expires_at
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}
