use crate::base::cookieerror::CookieError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// SameSite policy written as the trailing `sameSite=` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    #[default]
    Lax,
    None,
    Strict,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::None => "None",
            SameSite::Strict => "Strict",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            "strict" => Ok(SameSite::Strict),
            _ => Err(CookieError::InvalidSameSite(s.to_string())),
        }
    }
}

/// When a cookie expires. Absent means a session cookie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expiry {
    /// Days from now. Fractions are allowed; zero or NaN emits no `expires` attribute.
    Days(f64),
    /// Absolute point in time.
    At(OffsetDateTime),
}

impl From<OffsetDateTime> for Expiry {
    fn from(at: OffsetDateTime) -> Self {
        Expiry::At(at)
    }
}

impl From<i32> for Expiry {
    fn from(days: i32) -> Self {
        Expiry::Days(f64::from(days))
    }
}

impl From<i64> for Expiry {
    fn from(days: i64) -> Self {
        Expiry::Days(days as f64)
    }
}

impl From<f64> for Expiry {
    fn from(days: f64) -> Self {
        Expiry::Days(days)
    }
}

/// Attributes recognized by `set` and `delete`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CookieOptions {
    pub expires: Option<Expiry>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expires(mut self, expires: impl Into<Expiry>) -> Self {
        self.expires = Some(expires.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }
}

/// A single cookie about to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieAttributes {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

impl CookieAttributes {
    pub fn new(name: impl Into<String>, value: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options,
        }
    }

    /// Secure flag as it will be written. SameSite=None always needs Secure.
    pub fn effective_secure(&self) -> bool {
        self.options.secure || self.options.same_site == SameSite::None
    }
}
