//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting BoringSSL and IO errors into context-rich `CookieError` variants.

use crate::base::cookieerror::CookieError;
use boring::error::ErrorStack;
use std::io;
use std::path::Path;

/// Extension trait for adding context to BoringSSL Results.
pub trait CipherResultExt<T> {
    /// Tag a BoringSSL failure with the operation that produced it.
    ///
    /// # Example
    /// ```ignore
    /// use encryptcookie::base::context::CipherResultExt;
    ///
    /// let out = boring::symm::encrypt(cipher, &key, Some(&iv), data)
    ///     .cipher_context("encrypt")?;
    /// // Error: "Cipher failed during encrypt: ..."
    /// ```
    fn cipher_context(self, operation: &'static str) -> Result<T, CookieError>;
}

impl<T> CipherResultExt<T> for Result<T, ErrorStack> {
    fn cipher_context(self, operation: &'static str) -> Result<T, CookieError> {
        self.map_err(|e| CookieError::Cipher {
            operation,
            message: e.to_string(),
        })
    }
}

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Add file path context to an IO error.
    fn store_context(self, path: &Path) -> Result<T, CookieError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn store_context(self, path: &Path) -> Result<T, CookieError> {
        self.map_err(|e| CookieError::StoreIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
