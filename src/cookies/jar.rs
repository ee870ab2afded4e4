//! The cookie jar facade.
//!
//! [`EncryptedCookieJar`] routes every operation through the codec, and
//! through the cipher adapter when a value is encrypted. The host store is
//! probed once at construction; on a host without cookies every operation
//! becomes a no-op with an empty result.
//!
//! Nothing here is atomic with respect to other writers of the same store.
//! [`EncryptedCookieJar::delete_all`] reads the names first and then deletes
//! them one by one, so a cookie written in between survives.

use crate::base::cookieerror::CookieError;
use crate::cookies::canonicalcookie::{CookieAttributes, CookieOptions, Expiry};
use crate::cookies::cipher;
use crate::cookies::codec;
use crate::cookies::config::JarConfig;
use crate::cookies::crypto::CryptoProvider;
use crate::cookies::keyderive::{self, DerivedKey, KeyLength};
use crate::cookies::store::CookieStore;
use std::collections::HashMap;
use std::sync::Arc;
use time::macros::datetime;
use time::OffsetDateTime;

/// Expiry written by `delete`: `Thu, 01 Jan 1970 00:00:01 GMT`.
const DELETED_EXPIRY: OffsetDateTime = datetime!(1970-01-01 00:00:01 UTC);

/// Result of a `set` that did not hit a cipher error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Written,
    /// The host has no cookie store; nothing was written.
    HostUnavailable,
    /// Encryption was requested without a key; the store is unchanged.
    KeyMissing,
}

impl SetOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, SetOutcome::Written)
    }
}

pub struct EncryptedCookieJar {
    store: Arc<dyn CookieStore>,
    crypto: Arc<dyn CryptoProvider>,
    config: JarConfig,
    host_accessible: bool,
}

impl EncryptedCookieJar {
    /// Jar over `store` with the default BoringSSL provider and configuration.
    pub fn new(store: Arc<dyn CookieStore>) -> Self {
        Self::builder(store).build()
    }

    pub fn builder(store: Arc<dyn CookieStore>) -> EncryptedCookieJarBuilder {
        EncryptedCookieJarBuilder {
            store,
            crypto: None,
            config: JarConfig::default(),
        }
    }

    pub fn is_host_accessible(&self) -> bool {
        self.host_accessible
    }

    pub fn config(&self) -> &JarConfig {
        &self.config
    }

    /// Options pre-filled with the configured SameSite default.
    pub fn options(&self) -> CookieOptions {
        CookieOptions::new().same_site(self.config.default_same_site)
    }

    /// Generate a key under a fresh random salt. `None` falls back to the
    /// configured length and passphrase.
    pub fn derive_key(
        &self,
        length: Option<KeyLength>,
        passphrase: Option<&str>,
    ) -> Result<DerivedKey, CookieError> {
        let length = length.unwrap_or(self.config.default_key_length);
        let passphrase = passphrase
            .filter(|p| !p.is_empty())
            .unwrap_or(self.config.default_passphrase.as_str());
        keyderive::derive_key(&*self.crypto, passphrase, length)
    }

    /// Reproducible variant of [`derive_key`](Self::derive_key).
    pub fn derive_key_with_salt(
        &self,
        passphrase: &str,
        salt: &[u8],
        length: KeyLength,
    ) -> Result<DerivedKey, CookieError> {
        keyderive::derive_key_with_salt(&*self.crypto, passphrase, salt, length)
    }

    pub fn exists(&self, name: &str) -> bool {
        if !self.host_accessible {
            return false;
        }
        codec::exists(&self.store.read(), &codec::url_encode(name))
    }

    /// Read one cookie. The value is decrypted only when `encrypted` is set
    /// and a non-empty key is given; otherwise the stored value is returned as is.
    pub fn get(
        &self,
        name: &str,
        encrypted: bool,
        key: Option<&str>,
    ) -> Result<Option<String>, CookieError> {
        if !self.host_accessible {
            return Ok(None);
        }

        let Some(raw) = codec::decode(&self.store.read(), &codec::url_encode(name)) else {
            return Ok(None);
        };

        match key.filter(|k| !k.is_empty()) {
            Some(key) if encrypted => cipher::decrypt(&*self.crypto, &raw, Some(key)).map(Some),
            _ => {
                if encrypted {
                    tracing::debug!(cookie = %name, "no key given, returning stored value");
                }
                Ok(Some(raw))
            }
        }
    }

    /// Read every cookie, decrypting each value when `encrypted` is set and a
    /// non-empty key is given. The first value that fails to decrypt aborts the read.
    pub fn get_all(
        &self,
        encrypted: bool,
        key: Option<&str>,
    ) -> Result<HashMap<String, String>, CookieError> {
        if !self.host_accessible {
            return Ok(HashMap::new());
        }

        let cookies = codec::decode_all(&self.store.read());
        match key.filter(|k| !k.is_empty()) {
            Some(key) if encrypted => cookies
                .into_iter()
                .map(|(name, token)| {
                    cipher::decrypt(&*self.crypto, &token, Some(key)).map(|value| (name, value))
                })
                .collect(),
            _ => {
                if encrypted {
                    tracing::debug!("no key given, returning stored values");
                }
                Ok(cookies)
            }
        }
    }

    /// Write a cookie, encrypting the value first when `encrypt` is set.
    pub fn set(
        &self,
        name: &str,
        value: &str,
        encrypt: bool,
        key: Option<&str>,
        options: &CookieOptions,
    ) -> Result<SetOutcome, CookieError> {
        if !self.host_accessible {
            return Ok(SetOutcome::HostUnavailable);
        }

        let stored_value = if encrypt {
            match cipher::encrypt(&*self.crypto, value, key) {
                Ok(token) => token,
                Err(CookieError::MissingKey { .. }) => return Ok(SetOutcome::KeyMissing),
                Err(e) => return Err(e),
            }
        } else {
            value.to_string()
        };

        let attrs = CookieAttributes::new(name, stored_value, options.clone());
        let line = codec::encode(&attrs)?;
        self.store.write(&line);

        tracing::debug!(cookie = %name, encrypted = encrypt, "cookie set");
        Ok(SetOutcome::Written)
    }

    /// Expire a cookie. `path` and `domain` must match the ones it was set
    /// with; `expires` in `options` is ignored.
    pub fn delete(&self, name: &str, options: &CookieOptions) -> Result<(), CookieError> {
        if !self.host_accessible {
            return Ok(());
        }

        let mut options = options.clone();
        options.expires = Some(Expiry::At(DELETED_EXPIRY));
        self.set(name, "", false, None, &options)?;
        Ok(())
    }

    /// Expire every cookie currently visible. Returns how many were deleted.
    pub fn delete_all(&self, options: &CookieOptions) -> Result<usize, CookieError> {
        if !self.host_accessible {
            return Ok(0);
        }

        let names: Vec<String> = codec::decode_all(&self.store.read()).into_keys().collect();
        for name in &names {
            self.delete(name, options)?;
        }

        tracing::debug!(count = names.len(), "deleted all cookies");
        Ok(names.len())
    }
}

pub struct EncryptedCookieJarBuilder {
    store: Arc<dyn CookieStore>,
    crypto: Option<Arc<dyn CryptoProvider>>,
    config: JarConfig,
}

impl EncryptedCookieJarBuilder {
    /// Replace the crypto provider. By default one is built from the config.
    pub fn crypto(mut self, crypto: Arc<dyn CryptoProvider>) -> Self {
        self.crypto = Some(crypto);
        self
    }

    pub fn config(mut self, config: JarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> EncryptedCookieJar {
        let host_accessible = self.store.is_accessible();
        if !host_accessible {
            tracing::debug!("cookie store not accessible, jar operations are no-ops");
        }

        let crypto = self
            .crypto
            .unwrap_or_else(|| Arc::new(self.config.crypto()));

        EncryptedCookieJar {
            store: self.store,
            crypto,
            config: self.config,
            host_accessible,
        }
    }
}
