/// Authentication module
///
/// Token lifecycle and credential-verification core: password hashing,
/// access-token issuance, refresh-token management and the service
/// orchestrating them.

mod claims;
mod digest;
mod jwt;
mod password;
mod refresh_token;
pub mod service;

pub use claims::Claims;
pub use claims::ACCESS_TOKEN_TTL_SECS;
pub use digest::digest_token;
pub use jwt::issue_access_token;
pub use jwt::verify_access_token;
pub use password::hash_password;
pub use password::verify_password;
pub use refresh_token::generate_refresh_token;
pub use refresh_token::store_refresh_token;
pub use refresh_token::validate_and_consume;
pub use refresh_token::ConsumeError;
pub use refresh_token::REFRESH_TOKEN_TTL_SECS;
