//! Host cookie stores.
//!
//! The jar never owns cookie state; it reads and writes one flat string
//! through [`CookieStore`], the way a page script uses `document.cookie`.
//! Reads return every visible `name=value` pair joined by `; `. Writes take a
//! single encoded cookie line with attributes.
//!
//! [`MemoryCookieStore`] reproduces the host's assignment semantics for
//! non-browser use and tests. [`DetachedCookieStore`] stands in for hosts
//! with no cookie store at all, e.g. server-side rendering.

use crate::cookies::canonicalcookie::SameSite;
use cookie::Cookie;
use std::sync::{Mutex, MutexGuard};
use time::OffsetDateTime;

/// The host's cookie string.
pub trait CookieStore: Send + Sync {
    /// Whether the host exposes a cookie store. Checked once by the jar.
    fn is_accessible(&self) -> bool {
        true
    }

    /// The full `name=value; name=value` string.
    fn read(&self) -> String;

    /// Apply one cookie line, e.g. `id=1;path=/;sameSite=Lax;`.
    fn write(&self, cookie_line: &str);
}

/// A cookie held by [`MemoryCookieStore`]. Name and value are stored exactly
/// as written, still percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: Option<SameSite>,
    pub expires: Option<OffsetDateTime>,
}

impl StoredCookie {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|expiry| expiry <= now)
    }

    fn same_slot(&self, other: &StoredCookie) -> bool {
        self.name == other.name && self.path == other.path && self.domain == other.domain
    }

    fn from_line(cookie_line: &str, now: OffsetDateTime) -> Option<Self> {
        let parsed = match Cookie::parse(cookie_line) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unparsable cookie line");
                return None;
            }
        };

        // Max-Age wins over Expires, as in RFC 6265.
        let expires = match parsed.max_age() {
            Some(max_age) => now.checked_add(max_age),
            None => parsed.expires_datetime(),
        };

        let same_site = parsed.same_site().map(|s| match s {
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::None => SameSite::None,
        });

        Some(Self {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            path: parsed.path().map(str::to_string),
            domain: parsed.domain().map(|d| d.to_ascii_lowercase()),
            secure: parsed.secure().unwrap_or(false),
            same_site,
            expires,
        })
    }
}

/// In-process cookie string with `document.cookie` assignment semantics.
///
/// Cookies are keyed by name, path and domain. Writing a cookie whose expiry
/// is in the past removes the matching entry. Every cookie is visible
/// regardless of path or domain, since there is no current page to scope
/// against.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: Mutex<Vec<StoredCookie>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StoredCookie>> {
        // A panicking writer cannot leave the list half-updated.
        self.cookies.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or replace a cookie, dropping it if already expired.
    pub fn insert(&self, cookie: StoredCookie) {
        let now = OffsetDateTime::now_utc();
        let mut cookies = self.lock();

        let expired = cookie.is_expired(now);
        if let Some(pos) = cookies.iter().position(|c| c.same_slot(&cookie)) {
            if expired {
                cookies.remove(pos);
            } else {
                cookies[pos] = cookie;
            }
        } else if !expired {
            cookies.push(cookie);
        }
    }

    /// Live cookies in insertion order.
    pub fn cookies(&self) -> Vec<StoredCookie> {
        let now = OffsetDateTime::now_utc();
        let mut cookies = self.lock();
        cookies.retain(|c| !c.is_expired(now));
        cookies.clone()
    }

    pub fn len(&self) -> usize {
        self.cookies().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl CookieStore for MemoryCookieStore {
    fn read(&self) -> String {
        self.cookies()
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&self, cookie_line: &str) {
        let now = OffsetDateTime::now_utc();
        if let Some(cookie) = StoredCookie::from_line(cookie_line, now) {
            tracing::debug!(cookie = %cookie.name, "cookie store write");
            self.insert(cookie);
        }
    }
}

/// A host without a cookie store. Reads are empty and writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedCookieStore;

impl CookieStore for DetachedCookieStore {
    fn is_accessible(&self) -> bool {
        false
    }

    fn read(&self) -> String {
        String::new()
    }

    fn write(&self, _cookie_line: &str) {
        tracing::debug!("cookie write dropped: no cookie store on this host");
    }
}
