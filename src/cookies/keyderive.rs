//! Passphrase based key generation.
//!
//! Every call draws a fresh 128-bit salt, so two calls with the same
//! passphrase return different keys. The salt is not returned: callers must
//! keep the key itself if they want to read their cookies back later.
//! Use [`derive_key_with_salt`] when a reproducible key is needed.

use crate::base::cookieerror::CookieError;
use crate::cookies::crypto::CryptoProvider;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::ops::Deref;
use std::str::FromStr;
use zeroize::Zeroizing;

pub const DEFAULT_PASSPHRASE: &str = "Secret PassPhrase";

/// Salt size drawn for each derivation.
pub const SALT_LEN: usize = 128 / 8;

/// Supported key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum KeyLength {
    #[default]
    Bits128,
    Bits256,
    Bits512,
}

impl KeyLength {
    pub fn bits(&self) -> usize {
        match self {
            KeyLength::Bits128 => 128,
            KeyLength::Bits256 => 256,
            KeyLength::Bits512 => 512,
        }
    }

    pub fn bytes(&self) -> usize {
        self.bits() / 8
    }
}

impl TryFrom<u32> for KeyLength {
    type Error = CookieError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            128 => Ok(KeyLength::Bits128),
            256 => Ok(KeyLength::Bits256),
            512 => Ok(KeyLength::Bits512),
            _ => Err(CookieError::InvalidKeyLength(bits.to_string())),
        }
    }
}

impl From<KeyLength> for u32 {
    fn from(length: KeyLength) -> Self {
        length.bits() as u32
    }
}

impl FromStr for KeyLength {
    type Err = CookieError;

    /// Accepts `"256"` as well as the word-count notation `"256/32"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s.trim().strip_suffix("/32").unwrap_or(s.trim());
        bits.parse::<u32>()
            .map_err(|_| CookieError::InvalidKeyLength(s.to_string()))
            .and_then(KeyLength::try_from)
            .map_err(|_| CookieError::InvalidKeyLength(s.to_string()))
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// A generated key, rendered as lowercase hex. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey(Zeroizing<String>);

impl DerivedKey {
    fn from_bytes(bytes: &[u8]) -> Self {
        let mut hex = Zeroizing::new(String::with_capacity(bytes.len() * 2));
        for b in bytes {
            // Writing to a String cannot fail.
            let _ = write!(hex, "{b:02x}");
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of key bits the hex string encodes.
    pub fn bit_len(&self) -> usize {
        self.0.len() * 4
    }
}

impl Deref for DerivedKey {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for DerivedKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bits", &self.bit_len())
            .finish_non_exhaustive()
    }
}

/// Derive a key from `passphrase` under a fresh random salt.
pub fn derive_key(
    crypto: &dyn CryptoProvider,
    passphrase: &str,
    length: KeyLength,
) -> Result<DerivedKey, CookieError> {
    let mut salt = Zeroizing::new([0u8; SALT_LEN]);
    crypto.fill_random(&mut salt[..])?;
    let key = derive_key_with_salt(crypto, passphrase, &salt[..], length)?;

    tracing::debug!(bits = length.bits(), "derived cookie key");
    Ok(key)
}

/// Deterministic derivation for callers that manage their own salt.
pub fn derive_key_with_salt(
    crypto: &dyn CryptoProvider,
    passphrase: &str,
    salt: &[u8],
    length: KeyLength,
) -> Result<DerivedKey, CookieError> {
    let raw = Zeroizing::new(crypto.derive(passphrase.as_bytes(), salt, length.bits())?);
    if raw.len() != length.bytes() {
        return Err(CookieError::InvalidKeyLength(format!(
            "provider returned {} bytes for a {}-bit key",
            raw.len(),
            length.bits()
        )));
    }
    Ok(DerivedKey::from_bytes(&raw))
}
