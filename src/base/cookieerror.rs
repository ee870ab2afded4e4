use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CookieError {
    // Host Errors
    /// Code-table entry only. The jar reports an inaccessible host through
    /// `SetOutcome::HostUnavailable` and empty reads, never as an error.
    #[error("Cookie store is not accessible from this host")]
    HostUnavailable,
    #[error("Cookie store IO failed for {path}: {message}")]
    StoreIo { path: String, message: String },
    #[error("Cookie store snapshot is malformed: {message}")]
    StoreSnapshotInvalid { message: String },

    // Codec Errors
    #[error("Cookie name must not be empty")]
    EmptyCookieName,
    #[error("Cookie expiry is out of range")]
    InvalidExpiry,
    #[error("Invalid SameSite value: {0}")]
    InvalidSameSite(String),

    // Key Errors
    #[error("Key required to {operation}")]
    MissingKey { operation: &'static str },
    #[error("Invalid key length: {0}")]
    InvalidKeyLength(String),
    #[error("Unsupported key derivation digest: {0}")]
    UnsupportedDigest(String),

    // Cipher Errors
    #[error("Cipher failed during {operation}: {message}")]
    Cipher {
        operation: &'static str,
        message: String,
    },
    #[error("Ciphertext token is malformed: {reason}")]
    InvalidToken { reason: String },
    #[error("Decryption failed")]
    DecryptionFailed,
    #[error("Decrypted value is not valid UTF-8")]
    InvalidUtf8,

    // Configuration Errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl CookieError {
    pub fn as_i32(&self) -> i32 {
        match self {
            CookieError::HostUnavailable => -100,
            CookieError::StoreIo { .. } => -101,
            CookieError::StoreSnapshotInvalid { .. } => -102,

            CookieError::EmptyCookieName => -200,
            CookieError::InvalidExpiry => -201,
            CookieError::InvalidSameSite(_) => -202,

            CookieError::MissingKey { .. } => -300,
            CookieError::InvalidKeyLength(_) => -301,
            CookieError::UnsupportedDigest(_) => -302,

            CookieError::Cipher { .. } => -400,
            CookieError::InvalidToken { .. } => -401,
            CookieError::DecryptionFailed => -402,
            CookieError::InvalidUtf8 => -403,

            CookieError::InvalidConfig { .. } => -500,

            CookieError::Unknown(code) => *code,
        }
    }

    /// Errors raised by the cipher layer. These are the only failures the
    /// jar hands back to callers instead of degrading locally.
    pub fn is_cipher_failure(&self) -> bool {
        matches!(
            self,
            CookieError::Cipher { .. }
                | CookieError::InvalidToken { .. }
                | CookieError::DecryptionFailed
                | CookieError::InvalidUtf8
        )
    }

    pub fn missing_key(operation: &'static str) -> Self {
        CookieError::MissingKey { operation }
    }

    pub fn invalid_token(reason: impl Into<String>) -> Self {
        CookieError::InvalidToken {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        CookieError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Rebuilds the error kind for a code. Detail fields come back empty.
impl From<i32> for CookieError {
    fn from(code: i32) -> Self {
        match code {
            -100 => CookieError::HostUnavailable,
            -101 => CookieError::StoreIo {
                path: String::new(),
                message: String::new(),
            },
            -102 => CookieError::StoreSnapshotInvalid {
                message: String::new(),
            },

            -200 => CookieError::EmptyCookieName,
            -201 => CookieError::InvalidExpiry,
            -202 => CookieError::InvalidSameSite(String::new()),

            -300 => CookieError::MissingKey { operation: "" },
            -301 => CookieError::InvalidKeyLength(String::new()),
            -302 => CookieError::UnsupportedDigest(String::new()),

            -400 => CookieError::Cipher {
                operation: "",
                message: String::new(),
            },
            -401 => CookieError::InvalidToken {
                reason: String::new(),
            },
            -402 => CookieError::DecryptionFailed,
            -403 => CookieError::InvalidUtf8,

            -500 => CookieError::InvalidConfig {
                message: String::new(),
            },

            _ => CookieError::Unknown(code),
        }
    }
}
