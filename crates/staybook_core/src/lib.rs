//! Core domain logic for Staybook rentals.
//! This crate is the single source of truth for listing and booking invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod serializer;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, StaybookConfig};
pub use db::{open_db, open_db_in_memory, open_db_with_config, DbError};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::booking::{Booking, BookingId, BookingStatus};
pub use model::listing::{Listing, ListingId, RatingSummary};
pub use model::review::{Review, ReviewId};
pub use model::stay::Stay;
pub use model::user::{User, UserId};
pub use model::validation::ValidationError;
pub use repo::{RepoError, RepoResult};
pub use service::booking_service::BookingService;
pub use service::listing_service::ListingService;
pub use service::review_service::ReviewService;
pub use service::user_service::UserService;
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
