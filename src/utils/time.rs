// src/utils/time.rs

use chrono::{DateTime, Utc};

/// Current time as epoch milliseconds, the unit every stored timestamp uses.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Short day label for exam cards, e.g. "Oct 16".
pub fn day_label(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_default()
}
