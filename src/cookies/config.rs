//! Jar configuration.
//!
//! Defaults match the browser-side library this jar interoperates with:
//! passphrase `"Secret PassPhrase"`, 128-bit keys, one PBKDF2-HMAC-SHA1
//! round and `SameSite=Lax`.
//!
//! ```json
//! { "default_key_length": 256, "kdf_iterations": 10000, "kdf_digest": "sha256" }
//! ```

use crate::base::cookieerror::CookieError;
use crate::cookies::canonicalcookie::SameSite;
use crate::cookies::crypto::{BoringCrypto, KdfDigest};
use crate::cookies::keyderive::{KeyLength, DEFAULT_PASSPHRASE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JarConfig {
    pub default_passphrase: String,
    pub default_key_length: KeyLength,
    pub kdf_iterations: u32,
    pub kdf_digest: KdfDigest,
    pub default_same_site: SameSite,
}

impl Default for JarConfig {
    fn default() -> Self {
        Self {
            default_passphrase: DEFAULT_PASSPHRASE.to_string(),
            default_key_length: KeyLength::Bits128,
            kdf_iterations: 1,
            kdf_digest: KdfDigest::Sha1,
            default_same_site: SameSite::Lax,
        }
    }
}

impl JarConfig {
    pub fn from_json(json: &str) -> Result<Self, CookieError> {
        let config: JarConfig =
            serde_json::from_str(json).map_err(|e| CookieError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CookieError> {
        if self.kdf_iterations == 0 {
            return Err(CookieError::invalid_config("kdf_iterations must be at least 1"));
        }
        if self.default_passphrase.is_empty() {
            return Err(CookieError::invalid_config("default_passphrase must not be empty"));
        }
        Ok(())
    }

    /// The BoringSSL provider this configuration describes.
    pub fn crypto(&self) -> BoringCrypto {
        BoringCrypto::new()
            .with_iterations(self.kdf_iterations)
            .with_digest(self.kdf_digest)
    }
}
