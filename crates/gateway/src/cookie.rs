//! Session cookie store.
//!
//! The bearer token lives in a single HTTP-only cookie so client-side script
//! can never read or tamper with it. Every response path that detects an
//! invalid token clears the cookie, not just explicit logout; a dead token
//! left behind would loop the guard between "has token" and "token rejected".

use axum::http::{header, HeaderMap};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Session lifetime (~24h); the backend enforces real expiry on every
/// verification, this only bounds how long the browser keeps the cookie.
pub const SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Read the session token from the request's cookie header, if present.
pub fn read_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value installing a session.
pub fn set_value(token: &str, secure: bool) -> String {
    let mut value = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECS}"
    );
    if secure {
        value.push_str("; Secure");
    }
    value
}

/// `Set-Cookie` value removing the session.
pub fn clear_value(secure: bool) -> String {
    let mut value = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        value.push_str("; Secure");
    }
    value
}
