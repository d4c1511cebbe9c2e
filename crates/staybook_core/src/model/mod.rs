//! Persisted record shapes for the rental domain.
//!
//! # Responsibility
//! - Define users, listings, bookings and reviews as stored.
//! - Own record-level invariants (`validate()`) and field validators.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Record-level checks never consult other records; cross-record rules
//!   (capacity, conflicts, references) live in the service layer.

pub mod booking;
pub mod listing;
pub mod review;
pub mod stay;
pub mod user;
pub mod validation;
