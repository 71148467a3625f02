/// Password Hashing and Verification
///
/// One-way adaptive hashing with bcrypt. A wrong password is a `false`
/// result, never an error; errors are reserved for internal bcrypt
/// failure. Plaintext passwords are never logged or stored.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, CryptoError};

/// Hash a password using bcrypt at the default cost.
///
/// # Errors
/// Returns `CryptoError::Hashing` only on internal bcrypt failure.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Crypto(CryptoError::Hashing(e.to_string())))
}

/// Verify a password against its bcrypt hash.
///
/// The underlying comparison is constant-time. A mismatch is `Ok(false)`.
///
/// # Errors
/// Returns `CryptoError::Hashing` if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    verify(password, password_hash)
        .map_err(|e| AppError::Crypto(CryptoError::Hashing(e.to_string())))
}
