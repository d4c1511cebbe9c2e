//! Review record tied to one booking.

use crate::model::booking::BookingId;
use crate::model::user::UserId;
use crate::model::validation::{validate_rating, ValidationResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ReviewId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub booking_id: BookingId,
    pub user_id: UserId,
    /// Star rating in `1..=5`.
    pub rating: u8,
    pub comment: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Review {
    pub fn new(
        booking_id: BookingId,
        user_id: UserId,
        rating: u8,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id,
            user_id,
            rating,
            comment: comment.into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_rating(i64::from(self.rating))?;
        Ok(())
    }
}
