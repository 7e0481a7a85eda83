//! Timestamps for stored rows and upload names.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `created_at`.
pub type Timestamp = DateTime<Utc>;

/// Current UTC time, used for `created_at` and upload file names.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}
