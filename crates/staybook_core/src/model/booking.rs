//! Booking record and status lifecycle.
//!
//! # Responsibility
//! - Define the persisted reservation shape.
//! - Decide which statuses hold dates on the listing calendar.
//!
//! # Invariants
//! - `check_in_date < check_out_date`.
//! - `guests >= 1`.
//! - `total_price` is fixed at creation and never recomputed here.

use crate::model::listing::ListingId;
use crate::model::stay::Stay;
use crate::model::user::UserId;
use crate::model::validation::{validate_guests, ValidationResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BookingId = Uuid;

/// Reservation lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Requested, awaiting host confirmation.
    #[default]
    Pending,
    /// Accepted by the host.
    Confirmed,
    /// Withdrawn; dates are released.
    Cancelled,
    /// Stay finished.
    Completed,
}

impl BookingStatus {
    /// Statuses that hold dates on the listing calendar.
    pub const BLOCKING: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    /// Returns whether a booking in this status blocks overlapping stays.
    pub fn blocks_dates(self) -> bool {
        Self::BLOCKING.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Reservation of a listing by a user for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub listing_id: ListingId,
    pub user_id: UserId,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub special_requests: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Booking {
    /// Creates a pending booking with a generated id.
    pub fn new(
        listing_id: ListingId,
        user_id: UserId,
        stay: Stay,
        guests: u32,
        total_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            listing_id,
            user_id,
            check_in_date: stay.check_in(),
            check_out_date: stay.check_out(),
            guests,
            total_price,
            status: BookingStatus::Pending,
            special_requests: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Returns the occupied range, validating date order.
    pub fn stay(&self) -> ValidationResult<Stay> {
        Stay::new(self.check_in_date, self.check_out_date)
    }

    /// Number of nights booked.
    pub fn duration(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days()
    }

    pub fn validate(&self) -> ValidationResult<()> {
        self.stay()?;
        validate_guests(i64::from(self.guests))?;
        Ok(())
    }
}
