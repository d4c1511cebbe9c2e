//! Listing record and its derived rating statistics.
//!
//! # Invariants
//! - `price_per_night > 0`.
//! - `max_guests >= 1`.
//! - `title` and `location` are never blank.

use crate::model::review::Review;
use crate::model::user::UserId;
use crate::model::validation::{
    validate_max_guests, validate_price_per_night, validate_required_text, ValidationResult,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ListingId = Uuid;

/// Bookable property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub price_per_night: Decimal,
    pub location: String,
    pub property_type: String,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub amenities: Vec<String>,
    pub available: bool,
    pub host_id: UserId,
    /// Epoch milliseconds, maintained by storage.
    pub created_at: i64,
    /// Epoch milliseconds, maintained by storage.
    pub updated_at: i64,
}

impl Listing {
    /// Creates an available listing with a generated id.
    ///
    /// Room counts default to one bedroom/bathroom and amenities start empty.
    pub fn new(
        host_id: UserId,
        title: impl Into<String>,
        location: impl Into<String>,
        price_per_night: Decimal,
        max_guests: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            price_per_night,
            location: location.into(),
            property_type: String::new(),
            max_guests,
            bedrooms: 1,
            bathrooms: 1,
            amenities: Vec::new(),
            available: true,
            host_id,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required_text("title", &self.title)?;
        validate_required_text("location", &self.location)?;
        validate_price_per_night(self.price_per_night)?;
        validate_max_guests(i64::from(self.max_guests))?;
        Ok(())
    }
}

/// Rating statistics derived from the reviews of one listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    /// Mean rating rounded to two decimals; `None` without reviews.
    pub average_rating: Option<f64>,
    pub total_reviews: u32,
}

impl RatingSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let total_reviews = u32::try_from(reviews.len()).unwrap_or(u32::MAX);
        if reviews.is_empty() {
            return Self {
                average_rating: None,
                total_reviews,
            };
        }

        let sum: i64 = reviews.iter().map(|review| i64::from(review.rating)).sum();
        let mean = sum as f64 / reviews.len() as f64;
        Self {
            average_rating: Some((mean * 100.0).round() / 100.0),
            total_reviews,
        }
    }
}
