use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute a keyed digest of a session token and return it as hex.
///
/// Sessions store digests rather than raw tokens, so a database dump does
/// not leak usable credentials. The key comes from configuration; without
/// it a digest cannot be forged to match a stored row.
pub fn token_digest(key: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(token.as_bytes());
    let result = mac.finalize();
    format!("{:x}", result.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic_for_same_key_and_token() {
        let a = token_digest("secret-key", "token-value");
        let b = token_digest("secret-key", "token-value");
        assert_eq!(a, b);
    }

    #[test]
    fn digest_is_hex_sha256_length() {
        let digest = token_digest("secret-key", "token-value");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_keys_produce_different_digests() {
        let a = token_digest("key-one", "token-value");
        let b = token_digest("key-two", "token-value");
        assert_ne!(a, b);
    }

    #[test]
    fn different_tokens_produce_different_digests() {
        let a = token_digest("secret-key", "token-one");
        let b = token_digest("secret-key", "token-two");
        assert_ne!(a, b);
    }
}
