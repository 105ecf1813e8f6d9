//! Shared formatting helpers for query results and reports.

use std::time::Duration;

use chrono::{Local, TimeZone};

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format bytes in human-readable form using binary (1024) steps.
///
/// Picks the largest unit whose scaled value is at least 1 and prints two
/// decimals. Plain bytes are printed as an integer.
///
/// # Examples
///
/// ```
/// use fidx::utils::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(10), "10 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1073741824), "1.00 GB");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", SIZE_UNITS[unit])
}

/// Format a unix timestamp (seconds) as local wall-clock time.
///
/// Timestamps outside chrono's representable range fall back to the raw
/// number of seconds.
pub fn format_timestamp(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => secs.to_string(),
    }
}

/// Format a rebuild duration as whole milliseconds, e.g. `"42ms"`.
pub fn format_duration_ms(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}
