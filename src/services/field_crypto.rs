use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{engine::general_purpose, Engine as _};
use std::fmt;

use crate::errors::InternalError;

/// Display value substituted when a stored ciphertext cannot be decrypted
pub const REDACTED_PLACEHOLDER: &str = "***ENCRYPTED***";

const NONCE_LEN: usize = 12;

/// Symmetric encryption for designated PHI fields (e.g. SSN).
///
/// AES-256-GCM with a fresh random nonce per record; the nonce is stored
/// alongside the ciphertext as base64(nonce || ciphertext). Identical
/// plaintexts therefore produce distinct stored values.
pub struct FieldCrypto {
    cipher: Aes256Gcm,
}

impl FieldCrypto {
    /// Build from a base64-encoded 32-byte key
    pub fn new(key_base64: &str) -> Result<Self, InternalError> {
        let key_bytes = general_purpose::STANDARD
            .decode(key_base64)
            .map_err(|e| InternalError::Crypto(format!("invalid field encryption key: {e}")))?;

        if key_bytes.len() != 32 {
            return Err(InternalError::Crypto(
                "field encryption key must decode to 32 bytes".to_string(),
            ));
        }

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
        Ok(Self { cipher })
    }

    /// Encrypt a field value for persistence
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String, InternalError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| InternalError::Crypto("field encryption failed".to_string()))?;

        let mut stored = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        stored.extend_from_slice(&nonce);
        stored.extend_from_slice(&ciphertext);
        Ok(general_purpose::STANDARD.encode(stored))
    }

    /// Decrypt a stored field value for display.
    ///
    /// Any failure (bad encoding, truncation, wrong key, tampered tag)
    /// yields the redacted placeholder instead of an error.
    pub fn decrypt_field(&self, stored: &str) -> String {
        match self.try_decrypt(stored) {
            Some(plaintext) => plaintext,
            None => {
                tracing::warn!("field decryption failed, returning redacted value");
                REDACTED_PLACEHOLDER.to_string()
            }
        }
    }

    fn try_decrypt(&self, stored: &str) -> Option<String> {
        let bytes = general_purpose::STANDARD.decode(stored).ok()?;
        if bytes.len() <= NONCE_LEN {
            return None;
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self.cipher.decrypt(Nonce::from_slice(nonce), ciphertext).ok()?;
        String::from_utf8(plaintext).ok()
    }
}

impl fmt::Debug for FieldCrypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCrypto")
            .field("key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_crypto() -> FieldCrypto {
        // 32 zero bytes, base64
        FieldCrypto::new("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=").unwrap()
    }

    #[test]
    fn encrypt_then_decrypt_is_identity() {
        let crypto = test_crypto();
        let stored = crypto.encrypt_field("123-45-6789").unwrap();
        assert_eq!(crypto.decrypt_field(&stored), "123-45-6789");
    }

    #[test]
    fn empty_string_round_trips() {
        let crypto = test_crypto();
        let stored = crypto.encrypt_field("").unwrap();
        assert_eq!(crypto.decrypt_field(&stored), "");
    }

    #[test]
    fn same_plaintext_produces_distinct_ciphertexts() {
        let crypto = test_crypto();
        let first = crypto.encrypt_field("123-45-6789").unwrap();
        let second = crypto.encrypt_field("123-45-6789").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn corrupted_ciphertext_yields_placeholder() {
        let crypto = test_crypto();
        let mut stored = crypto.encrypt_field("123-45-6789").unwrap();
        stored.replace_range(..4, "XXXX");
        assert_eq!(crypto.decrypt_field(&stored), REDACTED_PLACEHOLDER);
    }

    #[test]
    fn garbage_input_yields_placeholder() {
        let crypto = test_crypto();
        assert_eq!(crypto.decrypt_field("not even base64 !!!"), REDACTED_PLACEHOLDER);
        assert_eq!(crypto.decrypt_field(""), REDACTED_PLACEHOLDER);
    }

    #[test]
    fn wrong_key_yields_placeholder() {
        let crypto = test_crypto();
        let other = FieldCrypto::new("AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE=").unwrap();
        let stored = crypto.encrypt_field("123-45-6789").unwrap();
        assert_eq!(other.decrypt_field(&stored), REDACTED_PLACEHOLDER);
    }

    #[test]
    fn rejects_short_key() {
        assert!(FieldCrypto::new("c2hvcnQ=").is_err());
    }

    #[test]
    fn debug_output_redacts_key() {
        let crypto = test_crypto();
        let debug = format!("{:?}", crypto);
        assert!(debug.contains("<redacted>"));
    }
}
