//! Wire types for the listing service.
//!
//! Both endpoints take a JSON body of the form `{"path": "..."}`. The
//! `/files` endpoint answers with the directory's immediate children,
//! pre-split into `folders` and `entries`; the `/open` endpoint answers
//! with an opaque payload that only matters for its success status.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Request body shared by the `/files` and `/open` endpoints.
#[derive(Debug, Serialize)]
pub struct PathRequest<'a> {
    pub path: &'a str,
}

/// A modification time as the service sends it: either epoch milliseconds
/// or an RFC 3339 string, depending on the backend version.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Millis(i64),
    Text(String),
}

impl WireTimestamp {
    /// Normalize to a single internal representation (UTC).
    /// Unparseable text timestamps yield `None`.
    pub fn normalize(&self) -> Option<DateTime<Utc>> {
        match self {
            WireTimestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            WireTimestamp::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// One filesystem object as described by the service.
///
/// `size` and `mtime` are only sent for files; directories carry just a path.
#[derive(Debug, Clone, Deserialize)]
pub struct WireEntry {
    pub path: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mtime: Option<WireTimestamp>,
}

/// Response of the `/files` endpoint: immediate children of one directory,
/// pre-split into subdirectories and files. Group order is meaningful and
/// preserved all the way to the screen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub folders: Vec<WireEntry>,
    #[serde(default)]
    pub entries: Vec<WireEntry>,
}
