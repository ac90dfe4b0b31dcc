//! Shared utility functions.

use chrono::{DateTime, Utc};

/// Telegram rejects messages longer than this many UTF-16 code units.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Formats an epoch timestamp for logs.
pub fn format_epoch(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0).map_or_else(
        || format!("{secs} (out of range)"),
        |timestamp| timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

/// Current time as epoch seconds.
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

/// Truncates a string to at most `max_units` UTF-16 code units, ending in an
/// ellipsis when cut. Telegram measures message length this way, so a
/// character outside the Basic Multilingual Plane counts twice.
pub fn truncate_utf16(input: &str, max_units: usize) -> String {
    if input.encode_utf16().count() <= max_units {
        return input.to_string();
    }
    let budget = max_units.saturating_sub('…'.len_utf16());
    let mut used = 0;
    let mut kept = String::new();
    for c in input.chars() {
        used += c.len_utf16();
        if used > budget {
            break;
        }
        kept.push(c);
    }
    kept.push('…');
    kept
}
