//! Review representation and write input.

use crate::model::booking::BookingId;
use crate::model::review::{Review, ReviewId};
use crate::model::user::UserId;
use crate::serializer::format_timestamp;
use crate::serializer::user::UserRepr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRepr {
    pub id: ReviewId,
    pub user: UserRepr,
    pub booking: BookingId,
    pub rating: u8,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ReviewRepr {
    pub fn new(review: &Review, user: UserRepr) -> Self {
        Self {
            id: review.id,
            user,
            booking: review.booking_id,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: format_timestamp(review.created_at),
            updated_at: format_timestamp(review.updated_at),
        }
    }
}

/// Incoming review payload.
///
/// `rating` is kept wide so out-of-range values reach the rating validator
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewInput {
    pub user_id: UserId,
    pub booking: BookingId,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}
