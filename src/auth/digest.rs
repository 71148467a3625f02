/// Token Hashing
///
/// Fast one-way digest for refresh tokens at rest. Refresh tokens
/// already carry 256 bits of entropy, so a plain cryptographic digest
/// is enough; adaptive cost is unnecessary here.

use sha2::{Digest, Sha256};

/// SHA-256 digest of a token, hex-encoded (64 chars). Pure function.
pub fn digest_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let hash1 = digest_token("some-opaque-token");
        let hash2 = digest_token("some-opaque-token");

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn digest_is_sha256_hex() {
        let hash = digest_token("some-opaque-token");

        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_tokens_different_digests() {
        assert_ne!(digest_token("token-a"), digest_token("token-b"));
    }

    #[test]
    fn digest_does_not_leak_plaintext() {
        let token = "some-opaque-token";
        assert_ne!(digest_token(token), token);
    }
}
