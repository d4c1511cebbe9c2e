//! Review use-case service.
//!
//! # Invariants
//! - A review references an existing booking and an existing user.
//! - Rating checks run before any reference lookup.

use crate::model::listing::ListingId;
use crate::model::review::{Review, ReviewId};
use crate::model::validation::{validate_rating, ValidationError};
use crate::repo::booking_repo::BookingRepository;
use crate::repo::review_repo::ReviewRepository;
use crate::repo::user_repo::UserRepository;
use crate::serializer::review::{ReviewInput, ReviewRepr};
use crate::service::{load_user_repr, ServiceError, ServiceResult};
use log::info;

pub struct ReviewService<R, B, U> {
    reviews: R,
    bookings: B,
    users: U,
}

impl<R, B, U> ReviewService<R, B, U>
where
    R: ReviewRepository,
    B: BookingRepository,
    U: UserRepository,
{
    pub fn new(reviews: R, bookings: B, users: U) -> Self {
        Self {
            reviews,
            bookings,
            users,
        }
    }

    /// Validates `input` and returns the review it describes under a fresh id.
    pub fn validate(&self, input: &ReviewInput) -> ServiceResult<Review> {
        let rating = validate_rating(input.rating)?;

        if self.bookings.get_booking(input.booking)?.is_none() {
            return Err(ValidationError::InvalidBooking(input.booking).into());
        }
        if self.users.get_user(input.user_id)?.is_none() {
            return Err(ValidationError::InvalidUser {
                field: "user_id",
                id: input.user_id,
            }
            .into());
        }

        // Range-checked above.
        let rating = u8::try_from(rating).map_err(|_| ValidationError::RatingOutOfRange(rating))?;
        Ok(Review::new(
            input.booking,
            input.user_id,
            rating,
            input.comment.clone(),
        ))
    }

    pub fn create(&self, input: &ReviewInput) -> ServiceResult<ReviewRepr> {
        let review = self.validate(input)?;
        let id = self.reviews.create_review(&review)?;
        info!(
            "event=review_create module=service status=ok review_id={id} booking_id={}",
            review.booking_id
        );
        self.get(id)
    }

    pub fn update(&self, id: ReviewId, input: &ReviewInput) -> ServiceResult<ReviewRepr> {
        let existing = self
            .reviews
            .get_review(id)?
            .ok_or(ServiceError::NotFound {
                entity: "review",
                id,
            })?;
        let replacement = self.validate(input)?;

        let review = Review {
            id: existing.id,
            created_at: existing.created_at,
            updated_at: existing.updated_at,
            ..replacement
        };
        self.reviews.update_review(&review)?;
        info!("event=review_update module=service status=ok review_id={id}");
        self.get(id)
    }

    pub fn get(&self, id: ReviewId) -> ServiceResult<ReviewRepr> {
        let review = self
            .reviews
            .get_review(id)?
            .ok_or(ServiceError::NotFound {
                entity: "review",
                id,
            })?;
        let user = load_user_repr(&self.users, review.user_id)?;
        Ok(ReviewRepr::new(&review, user))
    }

    /// Reviews attached to any booking of `listing_id`, oldest first.
    pub fn list_for_listing(&self, listing_id: ListingId) -> ServiceResult<Vec<ReviewRepr>> {
        self.reviews
            .list_reviews_for_listing(listing_id)?
            .iter()
            .map(|review| -> ServiceResult<ReviewRepr> {
                let user = load_user_repr(&self.users, review.user_id)?;
                Ok(ReviewRepr::new(review, user))
            })
            .collect()
    }
}
