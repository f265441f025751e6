//! Opaque page cursors.
//!
//! A cursor is the (order value, document id) position of the last item of a
//! page, serialized and base64-encoded so callers can hold it without knowing
//! its shape. Decoding a cursor that was not issued by this module is a
//! validation error, not a panic.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use petbook_common::{AppError, AppResult};
use petbook_db::QueryCursor;

/// Encode a store cursor into an opaque token.
#[must_use]
pub fn encode_cursor(cursor: &QueryCursor) -> String {
    // QueryCursor always serializes; the fallback is unreachable in practice.
    let json = serde_json::to_vec(cursor).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode an opaque token back into a store cursor.
pub fn decode_cursor(token: &str) -> AppResult<QueryCursor> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| AppError::Validation(format!("Malformed cursor: {token}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|_| AppError::Validation(format!("Malformed cursor: {token}")))
}
