//! Cookie string codec.
//!
//! Encodes a cookie and its attributes into the single line a host cookie
//! store accepts, and reads values back out of the flat `name=value; ...`
//! string the store returns.
//!
//! Names and values are percent-encoded with the `encodeURIComponent` set so
//! a raw `;` or `=` never reaches the store. Decoding is forgiving: a token
//! that is not valid percent-encoding comes back unchanged.

use crate::base::cookieerror::CookieError;
use crate::cookies::canonicalcookie::{CookieAttributes, Expiry};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

/// Characters `encodeURIComponent` leaves alone: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `Thu, 01 Jan 1970 00:00:01 GMT`
const UTC_STRING: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Largest offset a host date can represent (+/- 100,000,000 days).
const MAX_OFFSET_MILLIS: f64 = 8.64e15;

pub fn url_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Percent-decode `input`, returning it unchanged if any escape is malformed
/// or the decoded bytes are not UTF-8.
pub fn safe_decode(input: &str) -> Cow<'_, str> {
    if !has_valid_escapes(input) {
        tracing::debug!(token = %input, "malformed percent-encoding, keeping raw token");
        return Cow::Borrowed(input);
    }

    match percent_encoding::percent_decode_str(input).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => {
            tracing::debug!(token = %input, "percent-decoded bytes are not UTF-8, keeping raw token");
            Cow::Borrowed(input)
        }
    }
}

fn has_valid_escapes(input: &str) -> bool {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let ok = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !ok {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Format a timestamp the way hosts print `expires=`.
pub fn to_utc_string(at: OffsetDateTime) -> Result<String, CookieError> {
    at.to_offset(UtcOffset::UTC)
        .format(UTC_STRING)
        .map_err(|_| CookieError::InvalidExpiry)
}

fn resolve_expiry(expires: Expiry, now: OffsetDateTime) -> Result<Option<OffsetDateTime>, CookieError> {
    match expires {
        Expiry::At(at) => Ok(Some(at)),
        // Zero or NaN days means "no expiry", as in the host library.
        Expiry::Days(days) if days == 0.0 || days.is_nan() => Ok(None),
        Expiry::Days(days) => {
            let millis = days * MILLIS_PER_DAY;
            if !millis.is_finite() || millis.abs() > MAX_OFFSET_MILLIS {
                return Err(CookieError::InvalidExpiry);
            }
            now.checked_add(Duration::milliseconds(millis as i64))
                .map(Some)
                .ok_or(CookieError::InvalidExpiry)
        }
    }
}

/// Encode a cookie for writing to the store, using the current time for
/// relative expiries.
pub fn encode(attrs: &CookieAttributes) -> Result<String, CookieError> {
    encode_at(attrs, OffsetDateTime::now_utc())
}

/// Encode a cookie relative to `now`.
///
/// Attribute order is fixed: `expires`, `path`, `domain`, `secure`, `sameSite`.
pub fn encode_at(attrs: &CookieAttributes, now: OffsetDateTime) -> Result<String, CookieError> {
    if attrs.name.is_empty() {
        return Err(CookieError::EmptyCookieName);
    }

    let opts = &attrs.options;
    let mut line = format!("{}={};", url_encode(&attrs.name), url_encode(&attrs.value));

    if let Some(expires) = opts.expires {
        if let Some(at) = resolve_expiry(expires, now)? {
            line.push_str("expires=");
            line.push_str(&to_utc_string(at)?);
            line.push(';');
        }
    }

    if let Some(path) = opts.path.as_deref().filter(|p| !p.is_empty()) {
        line.push_str("path=");
        line.push_str(path);
        line.push(';');
    }

    if let Some(domain) = opts.domain.as_deref().filter(|d| !d.is_empty()) {
        line.push_str("domain=");
        line.push_str(domain);
        line.push(';');
    }

    let secure = attrs.effective_secure();
    if secure && !opts.secure {
        tracing::warn!(
            cookie = %attrs.name,
            "cookie was forced with secure flag because sameSite=None"
        );
    }
    if secure {
        line.push_str("secure;");
    }

    line.push_str("sameSite=");
    line.push_str(opts.same_site.as_str());
    line.push(';');

    Ok(line)
}

/// Pattern matching `name=` at the start of the store or after a `;`.
fn cookie_regex(name: &str) -> Option<Regex> {
    let escaped = regex::escape(name);
    let pattern = format!(r"(?:^{escaped}|;\s*{escaped})=(.*?)(?:;|$)");
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::debug!(cookie = %name, error = %e, "cookie name pattern rejected");
            None
        }
    }
}

/// Look up `name` in the store string and percent-decode its value.
///
/// `name` is matched literally, exactly as it appears in the store.
pub fn decode(store: &str, name: &str) -> Option<String> {
    if store.is_empty() {
        return None;
    }

    let re = cookie_regex(name)?;
    let captures = re.captures(store)?;
    let raw = captures.get(1)?.as_str();
    Some(safe_decode(raw).into_owned())
}

/// Whether `name` appears in the store string.
pub fn exists(store: &str, name: &str) -> bool {
    if store.is_empty() {
        return false;
    }

    cookie_regex(name).is_some_and(|re| re.is_match(store))
}

/// Split the store string into decoded name/value pairs.
///
/// Later duplicates win. Segments without a name are skipped.
pub fn decode_all(store: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    if store.is_empty() {
        return cookies;
    }

    for segment in store.split(';') {
        let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
        let name = name.strip_prefix(' ').unwrap_or(name);
        if name.is_empty() {
            continue;
        }

        cookies.insert(
            safe_decode(name).into_owned(),
            safe_decode(value).into_owned(),
        );
    }

    cookies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::canonicalcookie::{CookieOptions, SameSite};
    use time::macros::datetime;

    fn attrs(name: &str, value: &str, options: CookieOptions) -> CookieAttributes {
        CookieAttributes::new(name, value, options)
    }

    #[test]
    fn test_url_encode_matches_uri_component() {
        assert_eq!(url_encode("a b;c=d"), "a%20b%3Bc%3Dd");
        assert_eq!(url_encode("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(url_encode("é"), "%C3%A9");
        assert_eq!(url_encode("a+b/c"), "a%2Bb%2Fc");
    }

    #[test]
    fn test_safe_decode_malformed() {
        assert_eq!(safe_decode("a%20b"), "a b");
        assert_eq!(safe_decode("100%"), "100%");
        assert_eq!(safe_decode("a%20%zz"), "a%20%zz");
        // Valid escapes, but not UTF-8.
        assert_eq!(safe_decode("%E0%A4%A"), "%E0%A4%A");
        assert_eq!(safe_decode("%FF"), "%FF");
    }

    #[test]
    fn test_encode_minimal() {
        let line = encode(&attrs("session", "abc", CookieOptions::new())).unwrap();
        assert_eq!(line, "session=abc;sameSite=Lax;");
    }

    #[test]
    fn test_encode_attribute_order() {
        let opts = CookieOptions::new()
            .expires(datetime!(2030-01-02 03:04:05 UTC))
            .path("/app")
            .domain("example.com")
            .secure(true)
            .same_site(SameSite::Strict);
        let line = encode(&attrs("id", "1", opts)).unwrap();
        assert_eq!(
            line,
            "id=1;expires=Wed, 02 Jan 2030 03:04:05 GMT;path=/app;domain=example.com;secure;sameSite=Strict;"
        );
    }

    #[test]
    fn test_encode_relative_days() {
        let now = datetime!(2024-03-01 12:00:00 UTC);
        let line = encode_at(&attrs("k", "v", CookieOptions::new().expires(7)), now).unwrap();
        assert!(line.contains("expires=Fri, 08 Mar 2024 12:00:00 GMT;"), "{line}");
    }

    #[test]
    fn test_encode_zero_days_is_session() {
        let line = encode(&attrs("k", "v", CookieOptions::new().expires(0))).unwrap();
        assert!(!line.contains("expires="));
    }

    #[test]
    fn test_encode_converts_to_gmt() {
        let at = datetime!(2030-01-02 03:04:05 +02:00);
        let line = encode(&attrs("k", "v", CookieOptions::new().expires(at))).unwrap();
        assert!(line.contains("expires=Wed, 02 Jan 2030 01:04:05 GMT;"));
    }

    #[test]
    fn test_encode_forces_secure_for_same_site_none() {
        let opts = CookieOptions::new().secure(false).same_site(SameSite::None);
        let line = encode(&attrs("k", "v", opts)).unwrap();
        assert!(line.contains("secure;"));
        assert!(line.ends_with("sameSite=None;"));
    }

    #[test]
    fn test_encode_skips_empty_path_and_domain() {
        let opts = CookieOptions::new().path("").domain("");
        let line = encode(&attrs("k", "v", opts)).unwrap();
        assert_eq!(line, "k=v;sameSite=Lax;");
    }

    #[test]
    fn test_encode_rejects_empty_name() {
        let err = encode(&attrs("", "v", CookieOptions::new())).unwrap_err();
        assert_eq!(err, CookieError::EmptyCookieName);
    }

    #[test]
    fn test_encode_nan_days_is_session() {
        let line = encode(&attrs("k", "v", CookieOptions::new().expires(f64::NAN))).unwrap();
        assert_eq!(line, "k=v;sameSite=Lax;");
    }

    #[test]
    fn test_encode_rejects_absurd_expiry() {
        for days in [f64::INFINITY, f64::NEG_INFINITY, 1e9, 5_000_000.0] {
            let opts = CookieOptions::new().expires(Expiry::Days(days));
            assert_eq!(
                encode(&attrs("k", "v", opts)).unwrap_err(),
                CookieError::InvalidExpiry,
                "{days}"
            );
        }
    }

    #[test]
    fn test_encoded_value_never_contains_semicolon() {
        let line = encode(&attrs("k", "a;b;c", CookieOptions::new())).unwrap();
        let value = line.split(';').next().unwrap();
        assert_eq!(value, "k=a%3Bb%3Bc");
    }

    #[test]
    fn test_decode_first_and_later() {
        let store = "a=1; b=two%20words; c=3";
        assert_eq!(decode(store, "a").as_deref(), Some("1"));
        assert_eq!(decode(store, "b").as_deref(), Some("two words"));
        assert_eq!(decode(store, "c").as_deref(), Some("3"));
        assert_eq!(decode(store, "d"), None);
    }

    #[test]
    fn test_decode_does_not_match_suffix() {
        assert_eq!(decode("xa=1", "a"), None);
        assert_eq!(decode("b=2; xa=1", "a"), None);
    }

    #[test]
    fn test_decode_empty_store() {
        assert_eq!(decode("", "session"), None);
        assert!(!exists("", "session"));
    }

    #[test]
    fn test_exists_is_literal() {
        assert!(exists("a.b[c]=1", "a.b[c]"));
        assert!(!exists("aXb[c]=1", "a.b[c]"));
        assert!(!exists("a=1", ".*"));
    }

    #[test]
    fn test_decode_all() {
        let all = decode_all("a=1; b=x%3Dy; c%20d=%zz; flag");
        assert_eq!(all.len(), 4);
        assert_eq!(all["a"], "1");
        assert_eq!(all["b"], "x=y");
        assert_eq!(all["c d"], "%zz");
        assert_eq!(all["flag"], "");
    }

    #[test]
    fn test_decode_all_empty() {
        assert!(decode_all("").is_empty());
    }

    #[test]
    fn test_round_trip_plain() {
        for (name, value) in [("session", "abc"), ("x", "semi;colon = é"), ("e", "")] {
            let line = encode(&attrs(name, value, CookieOptions::new().path("/"))).unwrap();
            assert_eq!(decode(&line, &url_encode(name)).as_deref(), Some(value));
        }
    }
}
