/// Access Token Claims
///
/// Stateless bearer-capability payload; validity is established by
/// signature verification alone, never by a store lookup.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError};

/// Access tokens live for 15 minutes. Fixed by design: early revocation
/// is not supported, the short window bounds blast radius instead.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Claims embedded in every access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id as string)
    pub sub: String,
    /// Username
    pub username: String,
    /// Token-type marker, always "access"
    pub token_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a freshly issued access token.
    pub fn new(user_id: i32, username: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            username,
            token_type: "access".to_string(),
            iat: now,
            exp: now + ACCESS_TOKEN_TTL_SECS,
        }
    }

    /// Extract the numeric user id from the subject claim.
    pub fn user_id(&self) -> Result<i32, AppError> {
        self.sub
            .parse::<i32>()
            .map_err(|_| AppError::Auth(AuthError::TokenMalformed))
    }

    /// Check whether the token has expired.
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_carry_identity_and_type() {
        let claims = Claims::new(42, "alice".to_string());

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, "access");
        assert!(!claims.is_expired());
    }

    #[test]
    fn lifetime_is_fifteen_minutes() {
        let claims = Claims::new(1, "alice".to_string());

        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn user_id_round_trips() {
        let claims = Claims::new(7, "bob".to_string());
        assert_eq!(claims.user_id().unwrap(), 7);
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let mut claims = Claims::new(7, "bob".to_string());
        claims.sub = "not-a-number".to_string();

        assert!(claims.user_id().is_err());
    }
}
