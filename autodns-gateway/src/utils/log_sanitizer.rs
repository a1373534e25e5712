//! Log sanitization utilities
//!
//! Request bodies carry the gateway password in clear text and zone payloads
//! can be large; both are cleaned up before anything reaches the log.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Placeholder written in place of redacted secrets.
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
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` characters with a suffix
/// indicating the total length.
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

/// Replace the content of every `<password>` element.
pub fn redact_password(payload: &str) -> String {
    const OPEN: &str = "<password>";
    const CLOSE: &str = "</password>";

    let mut out = String::with_capacity(payload.len());
    let mut rest = payload;
    while let Some(start) = rest.find(OPEN) {
        let value_start = start + OPEN.len();
        let Some(len) = rest[value_start..].find(CLOSE) else {
            break;
        };
        out.push_str(&rest[..value_start]);
        out.push_str(REDACTED);
        rest = &rest[value_start + len..];
    }
    out.push_str(rest);
    out
}

/// Redact and truncate a request body for logging.
pub fn sanitize_request(payload: &str) -> String {
    truncate_for_log(&redact_password(payload))
}
