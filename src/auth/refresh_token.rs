/// Refresh Token Management
///
/// Opaque long-lived tokens backing access-token rotation:
/// - 32 bytes from a CSPRNG, hex-encoded (64 chars)
/// - hashed with SHA-256 before storage, plaintext never persisted
/// - single-use: consumed atomically on refresh (token rotation)
/// - database-backed so revocation-by-deletion works

use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sqlx::PgPool;

use crate::auth::digest::digest_token;
use crate::error::{AppError, CryptoError};
use crate::store;

/// Refresh tokens live for 7 days. Fixed by design.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Why a refresh token could not be consumed.
///
/// The distinction exists for logging only; the service collapses all
/// non-store variants into one uniform external failure.
#[derive(Debug)]
pub enum ConsumeError {
    /// No record matches the digest: forged, or already rotated.
    NotFound,
    /// The record existed but its expiry had passed; it has been deleted.
    Expired,
    /// The owning user no longer exists (orphan defense; cascade delete
    /// should make this unreachable).
    UserNotFound,
    /// The store itself failed.
    Store(AppError),
}

/// Generate a new opaque refresh token.
///
/// # Errors
/// Returns `CryptoError::Entropy` only if the CSPRNG is unavailable.
pub fn generate_refresh_token() -> Result<String, AppError> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Crypto(CryptoError::Entropy(e.to_string())))?;
    Ok(hex::encode(bytes))
}

/// Persist a refresh token for a user; only the digest is stored and the
/// record expires 7 days from now.
pub async fn store_refresh_token(
    pool: &PgPool,
    user_id: i32,
    token: &str,
) -> Result<(), AppError> {
    let token_hash = digest_token(token);
    let expires_at = Utc::now() + Duration::seconds(REFRESH_TOKEN_TTL_SECS);

    store::insert_refresh_token(pool, user_id, &token_hash, expires_at).await
}

/// Validate a refresh token and consume it.
///
/// The record is deleted in the same statement that looks it up, so a
/// token can be consumed exactly once; a concurrent attempt with the
/// same token fails `NotFound`. On success the caller is expected to
/// issue and store a replacement pair.
pub async fn validate_and_consume(
    pool: &PgPool,
    token: &str,
) -> Result<(i32, String), ConsumeError> {
    let token_hash = digest_token(token);

    let record = store::consume_refresh_token(pool, &token_hash)
        .await
        .map_err(ConsumeError::Store)?;

    let (user_id, expires_at) = match record {
        None => {
            tracing::warn!("Refresh token not found");
            return Err(ConsumeError::NotFound);
        }
        Some(record) => record,
    };

    if expires_at < Utc::now() {
        tracing::info!(user_id = user_id, "Refresh token expired");
        return Err(ConsumeError::Expired);
    }

    let username = store::find_username_by_id(pool, user_id)
        .await
        .map_err(ConsumeError::Store)?
        .ok_or_else(|| {
            tracing::warn!(user_id = user_id, "Refresh token owner no longer exists");
            ConsumeError::UserNotFound
        })?;

    Ok((user_id, username))
}
