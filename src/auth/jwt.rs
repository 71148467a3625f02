/// Access Token Issuance and Verification
///
/// Short-lived HS256-signed bearer tokens. Verification is
/// self-contained (signature + expiry), so request authorization never
/// costs a database round trip.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, CryptoError};

/// Issue a signed access token for a user.
///
/// # Errors
/// Returns an error only if signing itself fails.
pub fn issue_access_token(
    user_id: i32,
    username: &str,
    config: &JwtSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(user_id, username.to_string());

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Crypto(CryptoError::Hashing(format!("token signing failed: {}", e))))
}

/// Verify an access token and extract its claims.
///
/// # Errors
/// - `AuthError::TokenExpired` if `exp` has passed (no leeway)
/// - `AuthError::InvalidSignature` if the MAC does not match
/// - `AuthError::TokenMalformed` if the claims cannot be parsed
pub fn verify_access_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("Access token verification failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Auth(AuthError::TokenExpired)
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                AppError::Auth(AuthError::InvalidSignature)
            }
            _ => AppError::Auth(AuthError::TokenMalformed),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
        }
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let config = test_config();

        let token = issue_access_token(42, "alice", &config).expect("Failed to issue token");
        let claims = verify_access_token(&token, &config).expect("Failed to verify token");

        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn wrong_secret_fails_with_invalid_signature() {
        let config = test_config();
        let token = issue_access_token(42, "alice", &config).expect("Failed to issue token");

        let other = JwtSettings {
            secret: "a-completely-different-signing-secret!!".to_string(),
        };
        let result = verify_access_token(&token, &other);

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidSignature))
        ));
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let config = test_config();

        // Hand-craft claims whose exp is already in the past; the
        // signature itself is valid.
        let mut claims = Claims::new(42, "alice".to_string());
        claims.iat -= 3600;
        claims.exp = claims.iat + 900;

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("Failed to encode token");

        let result = verify_access_token(&token, &config);

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::TokenExpired))
        ));
    }

    #[test]
    fn garbage_fails_with_malformed() {
        let config = test_config();
        let result = verify_access_token("not.a.jwt", &config);

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::TokenMalformed))
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = test_config();
        let token = issue_access_token(42, "alice", &config).expect("Failed to issue token");

        let tampered = format!("{}X", token);
        assert!(verify_access_token(&tampered, &config).is_err());
    }
}
