//! Booking representations (full and nested) and write input.

use crate::model::booking::{Booking, BookingId, BookingStatus};
use crate::model::listing::ListingId;
use crate::model::user::UserId;
use crate::serializer::format_timestamp;
use crate::serializer::listing::ListingSummary;
use crate::serializer::user::UserRepr;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRepr {
    pub id: BookingId,
    pub listing: ListingSummary,
    pub user: UserRepr,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub special_requests: String,
    /// Nights between check-in and check-out.
    pub duration: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl BookingRepr {
    pub fn new(booking: &Booking, listing: ListingSummary, user: UserRepr) -> Self {
        Self {
            id: booking.id,
            listing,
            user,
            check_in_date: booking.check_in_date,
            check_out_date: booking.check_out_date,
            guests: booking.guests,
            total_price: booking.total_price,
            status: booking.status,
            special_requests: booking.special_requests.clone(),
            duration: booking.duration(),
            created_at: format_timestamp(booking.created_at),
            updated_at: format_timestamp(booking.updated_at),
        }
    }
}

/// Compact booking used in listing calendars and user histories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub id: BookingId,
    pub user: UserRepr,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub duration: i64,
}

impl BookingSummary {
    pub fn new(booking: &Booking, user: UserRepr) -> Self {
        Self {
            id: booking.id,
            user,
            check_in_date: booking.check_in_date,
            check_out_date: booking.check_out_date,
            guests: booking.guests,
            total_price: booking.total_price,
            status: booking.status,
            duration: booking.duration(),
        }
    }
}

/// Incoming booking payload for create and full update.
///
/// `total_price` is not accepted; it is derived at creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingInput {
    pub listing_id: ListingId,
    pub user_id: UserId,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: i64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub special_requests: String,
}
