//! Data models representing database entities.
//!
//! This module contains the rows stored by the repositories and the
//! request/response bodies exchanged with API clients.

use chrono::{DateTime, FixedOffset, Utc};

/// Device API key model
pub mod api_key;
/// User account and authentication payloads
pub mod user;

/// Render a stored UTC timestamp in the service's display offset.
pub fn localize(ts: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    ts.with_timezone(&offset)
}
