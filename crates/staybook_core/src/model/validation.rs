//! Field-level validators and the single validation error kind.
//!
//! # Responsibility
//! - Reject out-of-range field values before cross-field checks run.
//! - Carry a human-readable message plus the offending input field.
//!
//! # Invariants
//! - Validators return the accepted value unchanged (amenities are only
//!   unwrapped from JSON into strings).
//! - `Display` output is the exact message surfaced to end users.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Lowest accepted review rating.
pub const MIN_RATING: i64 = 1;
/// Highest accepted review rating.
pub const MAX_RATING: i64 = 5;

/// Validation failure raised by field validators and cross-field checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Rating outside `1..=5`.
    RatingOutOfRange(i64),
    /// Price per night is zero or negative.
    NonPositivePrice(Decimal),
    /// Listing capacity below one guest.
    MaxGuestsTooLow(i64),
    /// Booking guest count below one.
    GuestsTooLow(i64),
    /// Amenities payload is not a JSON array of strings.
    AmenitiesNotList,
    /// Required text field is empty after trim.
    BlankField(&'static str),
    /// Check-out is on or before check-in.
    CheckOutNotAfterCheckIn {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    /// Date outside the storable calendar, `0001-01-01..=9999-12-31`.
    DateOutOfRange {
        field: &'static str,
        date: NaiveDate,
    },
    /// Check-in is earlier than the current date.
    CheckInInPast { check_in: NaiveDate, today: NaiveDate },
    /// Guest count exceeds listing capacity.
    GuestsExceedCapacity { guests: u32, max_guests: u32 },
    /// Listing reference does not resolve.
    InvalidListing(Uuid),
    /// User or host reference does not resolve.
    InvalidUser { field: &'static str, id: Uuid },
    /// Booking reference does not resolve.
    InvalidBooking(Uuid),
    /// An active booking already holds part of the requested stay.
    ListingUnavailable,
    /// Nights times nightly price does not fit a decimal.
    TotalPriceTooLarge,
}

impl ValidationError {
    /// Returns the input field this error belongs to.
    ///
    /// `None` means a non-field (cross-field) error.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::RatingOutOfRange(_) => Some("rating"),
            Self::NonPositivePrice(_) => Some("price_per_night"),
            Self::MaxGuestsTooLow(_) => Some("max_guests"),
            Self::GuestsTooLow(_) => Some("guests"),
            Self::AmenitiesNotList => Some("amenities"),
            Self::BlankField(field) => Some(*field),
            Self::InvalidUser { field, .. } => Some(*field),
            Self::InvalidBooking(_) => Some("booking"),
            Self::DateOutOfRange { field, .. } => Some(*field),
            Self::CheckOutNotAfterCheckIn { .. }
            | Self::CheckInInPast { .. }
            | Self::GuestsExceedCapacity { .. }
            | Self::InvalidListing(_)
            | Self::ListingUnavailable
            | Self::TotalPriceTooLarge => None,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RatingOutOfRange(_) => write!(f, "Rating must be between 1 and 5."),
            Self::NonPositivePrice(_) => write!(f, "Price per night must be positive."),
            Self::MaxGuestsTooLow(_) => write!(f, "Max guests must be at least 1."),
            Self::GuestsTooLow(_) => write!(f, "Guests must be at least 1."),
            Self::AmenitiesNotList => write!(f, "Amenities must be a list."),
            Self::BlankField(_) => write!(f, "This field may not be blank."),
            Self::CheckOutNotAfterCheckIn { .. } => {
                write!(f, "Check-out date must be after check-in date.")
            }
            Self::DateOutOfRange { .. } => {
                write!(f, "Date must be between 0001-01-01 and 9999-12-31.")
            }
            Self::CheckInInPast { .. } => write!(f, "Check-in date cannot be in the past."),
            Self::GuestsExceedCapacity { guests, max_guests } => write!(
                f,
                "Number of guests ({guests}) exceeds maximum capacity ({max_guests})."
            ),
            Self::InvalidListing(_) => write!(f, "Invalid listing ID."),
            Self::InvalidUser { .. } => write!(f, "Invalid user ID."),
            Self::InvalidBooking(_) => write!(f, "Invalid booking ID."),
            Self::ListingUnavailable => {
                write!(f, "Listing is not available for the selected dates.")
            }
            Self::TotalPriceTooLarge => write!(f, "Total price is too large."),
        }
    }
}

impl Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accepts ratings in `1..=5`.
pub fn validate_rating(value: i64) -> ValidationResult<i64> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(ValidationError::RatingOutOfRange(value));
    }
    Ok(value)
}

/// Accepts strictly positive nightly prices.
pub fn validate_price_per_night(value: Decimal) -> ValidationResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice(value));
    }
    Ok(value)
}

/// Accepts listing capacities of at least one guest.
pub fn validate_max_guests(value: i64) -> ValidationResult<u32> {
    if value <= 0 {
        return Err(ValidationError::MaxGuestsTooLow(value));
    }
    u32::try_from(value).map_err(|_| ValidationError::MaxGuestsTooLow(value))
}

/// Accepts booking party sizes of at least one guest.
pub fn validate_guests(value: i64) -> ValidationResult<u32> {
    if value <= 0 {
        return Err(ValidationError::GuestsTooLow(value));
    }
    u32::try_from(value).map_err(|_| ValidationError::GuestsTooLow(value))
}

/// Accepts a JSON array whose items are all strings.
///
/// A bare string, object, number or `null` is rejected rather than coerced.
pub fn validate_amenities(value: &Value) -> ValidationResult<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(ValidationError::AmenitiesNotList);
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(ValidationError::AmenitiesNotList)
        })
        .collect()
}

/// Accepts text with at least one non-whitespace character.
pub fn validate_required_text(field: &'static str, value: &str) -> ValidationResult<String> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(value.to_string())
}
