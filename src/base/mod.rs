//! Base types and error handling.
//!
//! - [`CookieError`](cookieerror::CookieError): error codes for every layer of the jar
//! - [`context`]: extension traits that attach context to foreign errors

pub mod context;
pub mod cookieerror;
