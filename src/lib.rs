//! # encryptcookie
//!
//! Optionally-encrypted cookie storage over a host cookie string.
//!
//! `encryptcookie` reads and writes cookies through the same flat
//! `name=value; ...` string a page script sees as `document.cookie`, and can
//! seal values with AES before they reach the store.
//!
//! ## Features
//!
//! - **Cookie Codec**: fixed attribute order, `encodeURIComponent` escaping, literal name matching
//! - **Encryption**: OpenSSL `Salted__` AES-256-CBC tokens, interoperable with browser crypto libraries
//! - **Key Derivation**: PBKDF2 keys of 128, 256 or 512 bits
//! - **Host Abstraction**: injected cookie store, detached hosts degrade to no-ops
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use encryptcookie::cookies::canonicalcookie::{CookieOptions, SameSite};
//! use encryptcookie::cookies::jar::EncryptedCookieJar;
//! use encryptcookie::cookies::store::MemoryCookieStore;
//! use std::sync::Arc;
//!
//! let jar = EncryptedCookieJar::new(Arc::new(MemoryCookieStore::new()));
//! let key = jar.derive_key(None, None)?;
//!
//! let opts = CookieOptions::new().path("/").same_site(SameSite::Strict);
//! jar.set("token", "s3cr3t", true, Some(key.as_str()), &opts)?;
//! let token = jar.get("token", true, Some(key.as_str()))?;
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions and context helpers
//! - [`cookies`] - Codec, crypto, stores and the jar facade
//!
//! ## Security
//!
//! - AES-CBC tokens carry no authentication tag: a wrong key is reported as a
//!   generic decryption failure and cannot be told apart from a corrupted token
//! - Derived keys are zeroized on drop and never persisted by the crate
//! - `SameSite=None` cookies are always written with `Secure`

pub mod base;
pub mod cookies;
