//! Encrypted cookie storage.
//!
//! This module provides a cookie jar over a host cookie string:
//!
//! - **Codec**: encode one cookie line, decode values out of the store string ([`codec`])
//! - **Key derivation**: PBKDF2 keys under a fresh random salt ([`keyderive`])
//! - **Encryption**: OpenSSL-compatible AES-256-CBC tokens ([`cipher`], [`crypto`])
//! - **Facade**: get / set / delete / enumerate ([`EncryptedCookieJar`](jar::EncryptedCookieJar))
//! - **Hosts**: in-memory and detached stores, JSON snapshots ([`store`], [`persistence`])
//!
//! # Architecture
//!
//! | Concern | Module | Responsibility |
//! |---------|--------|----------------|
//! | Wire format | [`codec`] | `name=value;expires=..;path=..;domain=..;secure;sameSite=..;` |
//! | Primitives | [`crypto`] | [`CryptoProvider`](crypto::CryptoProvider) seam, BoringSSL default |
//! | Values | [`cipher`] | plaintext <-> base64 token, missing-key handling |
//! | Keys | [`keyderive`] | `derive_key(passphrase, 128 / 256 / 512)` |
//! | Host | [`store`] | [`CookieStore`](store::CookieStore) read/write of the flat string |
//!
//! # Encrypted round trip
//!
//! ```rust,no_run
//! use encryptcookie::cookies::canonicalcookie::CookieOptions;
//! use encryptcookie::cookies::jar::EncryptedCookieJar;
//! use encryptcookie::cookies::store::MemoryCookieStore;
//! use std::sync::Arc;
//!
//! let jar = EncryptedCookieJar::new(Arc::new(MemoryCookieStore::new()));
//! let key = jar.derive_key(None, None)?;
//!
//! jar.set("session", "abc", true, Some(key.as_str()), &CookieOptions::new().expires(7))?;
//! assert_eq!(jar.get("session", true, Some(key.as_str()))?.as_deref(), Some("abc"));
//! # Ok::<(), encryptcookie::base::cookieerror::CookieError>(())
//! ```
//!
//! The key returned by `derive_key` cannot be regenerated from the
//! passphrase later. Keep it for as long as the cookie lives.

pub mod canonicalcookie;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod jar;
pub mod keyderive;
pub mod persistence;
pub mod store;
