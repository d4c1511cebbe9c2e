//! External representations of rental records.
//!
//! # Responsibility
//! - `*Repr` / `*Summary` types are what callers serialize to clients.
//! - `*Input` types are what callers deserialize from clients.
//!
//! # Invariants
//! - Inputs never carry read-only fields (`id`, `total_price`, timestamps);
//!   such keys in incoming JSON are ignored.
//! - Write-only references (`host_id`, `listing_id`, `user_id`) never appear
//!   in representations; the nested record is rendered instead.
//! - Decimals render as strings, dates as `YYYY-MM-DD`, timestamps as RFC 3339.

use chrono::{DateTime, SecondsFormat};

pub mod booking;
pub mod listing;
pub mod review;
pub mod user;

/// Renders storage epoch milliseconds as RFC 3339 UTC.
pub fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|value| value.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
