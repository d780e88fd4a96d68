//! Request authentication for the relay endpoint.
//!
//! Exactly one strategy: the caller presents the shared secret in the
//! `X-Relay-Token` header, compared byte-for-byte against the configured
//! token. The check runs before the request body is even parsed, so an
//! unauthorized caller learns nothing about the wire contract.

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

/// Header carrying the caller's shared secret.
pub const RELAY_TOKEN_HEADER: &str = "x-relay-token";

/// Constant-time token comparison to prevent timing attacks
pub fn verify_token(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Check the relay token header against the configured secret.
/// Missing header, non-ASCII value, and mismatch all reject.
pub fn authorize_request(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(RELAY_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|provided| verify_token(expected, provided))
}
