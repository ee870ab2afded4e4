//! Cookie persistence - save and load a memory store to/from disk.
//!
//! Provides JSON-based snapshots for [`MemoryCookieStore`]. Values are written
//! as stored, so encrypted cookies stay encrypted on disk.

use crate::base::context::IoResultExt;
use crate::base::cookieerror::CookieError;
use crate::cookies::canonicalcookie::SameSite;
use crate::cookies::store::{MemoryCookieStore, StoredCookie};
use std::fs;
use std::path::Path;
use time::OffsetDateTime;

use serde::{Deserialize, Serialize};

/// Serializable representation of a cookie for persistence.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct PersistentCookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
    secure: bool,
    same_site: Option<SameSite>,
    expires_unix_secs: Option<i64>,
}

/// Save the live cookies of `store` to `path`.
///
/// # Example
/// ```ignore
/// persistence::save_cookies(&store, Path::new("/path/to/cookies.json"))?;
/// ```
pub fn save_cookies(store: &MemoryCookieStore, path: &Path) -> Result<usize, CookieError> {
    let all_cookies: Vec<PersistentCookie> = store
        .cookies()
        .into_iter()
        .map(|cookie| PersistentCookie {
            expires_unix_secs: cookie.expires.map(|t| t.unix_timestamp()),
            name: cookie.name,
            value: cookie.value,
            path: cookie.path,
            domain: cookie.domain,
            secure: cookie.secure,
            same_site: cookie.same_site,
        })
        .collect();

    let json = serde_json::to_string_pretty(&all_cookies).map_err(|e| {
        CookieError::StoreSnapshotInvalid {
            message: e.to_string(),
        }
    })?;

    fs::write(path, json).store_context(path)?;
    tracing::debug!(path = %path.display(), count = all_cookies.len(), "saved cookie snapshot");
    Ok(all_cookies.len())
}

/// Load a snapshot from `path` into a new store. Expired cookies are skipped.
///
/// # Example
/// ```ignore
/// let store = persistence::load_cookies(Path::new("/path/to/cookies.json"))?;
/// ```
pub fn load_cookies(path: &Path) -> Result<MemoryCookieStore, CookieError> {
    let json = fs::read_to_string(path).store_context(path)?;
    let persistent_cookies: Vec<PersistentCookie> =
        serde_json::from_str(&json).map_err(|e| CookieError::StoreSnapshotInvalid {
            message: e.to_string(),
        })?;

    let store = MemoryCookieStore::new();
    let now = OffsetDateTime::now_utc();

    for pc in persistent_cookies {
        let expires = match pc.expires_unix_secs {
            Some(secs) => match OffsetDateTime::from_unix_timestamp(secs) {
                Ok(expires) => Some(expires),
                Err(_) => {
                    tracing::warn!(cookie = %pc.name, secs, "skipping cookie with out of range expiry");
                    continue;
                }
            },
            None => None,
        };

        if expires.is_some_and(|e| e <= now) {
            continue; // Skip expired
        }

        store.insert(StoredCookie {
            name: pc.name,
            value: pc.value,
            path: pc.path,
            domain: pc.domain,
            secure: pc.secure,
            same_site: pc.same_site,
            expires,
        });
    }

    Ok(store)
}
