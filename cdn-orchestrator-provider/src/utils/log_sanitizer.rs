//! Log sanitization utilities
//!
//! Keeps bearer tokens and object-storage credentials out of debug/error logs
//! and bounds the size of logged response bodies.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// JSON keys whose values are replaced before a body is logged.
const SECRET_KEYS: &[&str] = &["accessKey", "secretKey", "token", "password"];

const REDACTED: &str = "***";

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Strings within the limit are returned unchanged; longer ones are cut at a
/// char boundary and suffixed with the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Render a request body for logging with credential values masked.
pub fn redact_body(body: &serde_json::Value) -> String {
    let mut masked = body.clone();
    mask_secrets(&mut masked);
    truncate_for_log(&masked.to_string())
}

fn mask_secrets(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                if SECRET_KEYS.contains(&key.as_str()) && !inner.is_null() {
                    *inner = serde_json::Value::String(REDACTED.to_string());
                } else {
                    mask_secrets(inner);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(mask_secrets),
        _ => {}
    }
}
