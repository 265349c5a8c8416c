//! Display formatting for entry metadata: sizes and modification times.

use chrono::{DateTime, Utc};

/// Format bytes into a human-readable size string using binary units.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    const TIB: u64 = 1024 * GIB;

    if bytes >= TIB {
        format!("{:.2} TiB", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a modification time for display (UTC, minute precision).
pub fn format_mtime(mtime: &DateTime<Utc>) -> String {
    mtime.format("%Y-%m-%d %H:%M").to_string()
}
