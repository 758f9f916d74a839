//! Utility functions and helpers.

pub mod http;

use chrono::{DateTime, Utc};

/// Current UNIX time in seconds.
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Render a UNIX timestamp for log output.
///
/// Out-of-range values are returned as the raw number.
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
