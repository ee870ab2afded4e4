//! String level encrypt/decrypt for cookie values.
//!
//! Wraps a [`CryptoProvider`] so a plaintext cookie value becomes an opaque,
//! base64 ciphertext token and back. A missing or empty key is reported as
//! [`CookieError::MissingKey`] and logged; nothing panics.

use crate::base::cookieerror::CookieError;
use crate::cookies::crypto::{CipherOp, CryptoProvider};
use base64::{engine::general_purpose::STANDARD, Engine as _};

fn require_key<'a>(key: Option<&'a str>, op: CipherOp) -> Result<&'a str, CookieError> {
    match key {
        Some(key) if !key.is_empty() => Ok(key),
        _ => {
            tracing::error!(operation = op.as_str(), "secret key required for cookie value");
            Err(CookieError::missing_key(op.as_str()))
        }
    }
}

/// Encrypt `plaintext` under `key` and return the base64 token.
pub fn encrypt(
    crypto: &dyn CryptoProvider,
    plaintext: &str,
    key: Option<&str>,
) -> Result<String, CookieError> {
    let key = require_key(key, CipherOp::Encrypt)?;
    let sealed = crypto.cipher(CipherOp::Encrypt, plaintext.as_bytes(), key.as_bytes())?;
    Ok(STANDARD.encode(sealed))
}

/// Decrypt a token produced by [`encrypt`].
///
/// A wrong key is indistinguishable from a corrupted token: both surface as
/// a cipher failure.
pub fn decrypt(
    crypto: &dyn CryptoProvider,
    token: &str,
    key: Option<&str>,
) -> Result<String, CookieError> {
    let key = require_key(key, CipherOp::Decrypt)?;
    let sealed = STANDARD
        .decode(token.trim())
        .map_err(|e| CookieError::invalid_token(e.to_string()))?;
    let plaintext = crypto.cipher(CipherOp::Decrypt, &sealed, key.as_bytes())?;
    String::from_utf8(plaintext).map_err(|_| CookieError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::crypto::BoringCrypto;

    #[test]
    fn test_round_trip() {
        let crypto = BoringCrypto::new();
        for plaintext in ["v", "", "a longer value; with = signs", "ünïcödé ✓"] {
            let token = encrypt(&crypto, plaintext, Some("mykey")).unwrap();
            assert_eq!(decrypt(&crypto, &token, Some("mykey")).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_token_is_salted_base64() {
        let token = encrypt(&BoringCrypto::new(), "v", Some("mykey")).unwrap();
        // base64("Salted__")
        assert!(token.starts_with("U2FsdGVkX1"));
    }

    #[test]
    fn test_same_plaintext_different_tokens() {
        let crypto = BoringCrypto::new();
        let a = encrypt(&crypto, "v", Some("k")).unwrap();
        let b = encrypt(&crypto, "v", Some("k")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_key() {
        let crypto = BoringCrypto::new();
        assert_eq!(
            encrypt(&crypto, "v", None).unwrap_err(),
            CookieError::missing_key("encrypt")
        );
        assert_eq!(
            encrypt(&crypto, "v", Some("")).unwrap_err(),
            CookieError::missing_key("encrypt")
        );
        assert_eq!(
            decrypt(&crypto, "U2FsdGVkX1", None).unwrap_err(),
            CookieError::missing_key("decrypt")
        );
    }

    #[test]
    fn test_wrong_key_never_yields_plaintext() {
        let crypto = BoringCrypto::new();
        let token = encrypt(&crypto, "v", Some("mykey")).unwrap();
        let result = decrypt(&crypto, &token, Some("wrongkey"));
        assert!(!matches!(result, Ok(ref v) if v == "v"));
        if let Err(e) = result {
            assert!(e.is_cipher_failure());
        }
    }

    #[test]
    fn test_not_base64() {
        let err = decrypt(&BoringCrypto::new(), "***", Some("k")).unwrap_err();
        assert!(matches!(err, CookieError::InvalidToken { .. }));
    }
}
