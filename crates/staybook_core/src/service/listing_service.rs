//! Listing use-case service.
//!
//! # Responsibility
//! - Validate listing input field by field and resolve the host.
//! - Render full listing detail with reviews and rating statistics.
//!
//! # Invariants
//! - Updates use full replacement semantics; `id` and `created_at` are kept.

use crate::model::listing::{Listing, ListingId, RatingSummary};
use crate::model::validation::{
    validate_amenities, validate_max_guests, validate_price_per_night, validate_required_text,
    ValidationError,
};
use crate::repo::listing_repo::{ListingListQuery, ListingRepository};
use crate::repo::review_repo::ReviewRepository;
use crate::repo::user_repo::UserRepository;
use crate::serializer::listing::{ListingInput, ListingRepr, ListingSummary};
use crate::serializer::review::ReviewRepr;
use crate::service::{load_listing_summary, load_user_repr, ServiceError, ServiceResult};
use log::{info, warn};

pub struct ListingService<L, U, R> {
    listings: L,
    users: U,
    reviews: R,
}

impl<L, U, R> ListingService<L, U, R>
where
    L: ListingRepository,
    U: UserRepository,
    R: ReviewRepository,
{
    pub fn new(listings: L, users: U, reviews: R) -> Self {
        Self {
            listings,
            users,
            reviews,
        }
    }

    /// Validates `input` and returns the listing it describes under a fresh id.
    pub fn validate(&self, input: &ListingInput) -> ServiceResult<Listing> {
        let result = self.check(input);
        if let Err(ServiceError::Validation(err)) = &result {
            warn!(
                "event=listing_validate module=service status=rejected field={}",
                err.field().unwrap_or("non_field")
            );
        }
        result
    }

    fn check(&self, input: &ListingInput) -> ServiceResult<Listing> {
        let title = validate_required_text("title", &input.title)?;
        let location = validate_required_text("location", &input.location)?;
        let price_per_night = validate_price_per_night(input.price_per_night)?;
        let max_guests = validate_max_guests(input.max_guests)?;
        let amenities = validate_amenities(&input.amenities)?;

        if self.users.get_user(input.host_id)?.is_none() {
            return Err(ValidationError::InvalidUser {
                field: "host_id",
                id: input.host_id,
            }
            .into());
        }

        let mut listing = Listing::new(input.host_id, title, location, price_per_night, max_guests);
        listing.description = input.description.clone();
        listing.property_type = input.property_type.clone();
        listing.bedrooms = input.bedrooms;
        listing.bathrooms = input.bathrooms;
        listing.amenities = amenities;
        listing.available = input.available;
        Ok(listing)
    }

    pub fn create(&self, input: &ListingInput) -> ServiceResult<ListingRepr> {
        let listing = self.validate(input)?;
        let id = self.listings.create_listing(&listing)?;
        info!("event=listing_create module=service status=ok listing_id={id}");
        self.get(id)
    }

    pub fn update(&self, id: ListingId, input: &ListingInput) -> ServiceResult<ListingRepr> {
        let existing = self
            .listings
            .get_listing(id)?
            .ok_or(ServiceError::NotFound {
                entity: "listing",
                id,
            })?;
        let replacement = self.validate(input)?;

        let listing = Listing {
            id: existing.id,
            created_at: existing.created_at,
            updated_at: existing.updated_at,
            ..replacement
        };
        self.listings.update_listing(&listing)?;
        info!("event=listing_update module=service status=ok listing_id={id}");
        self.get(id)
    }

    /// Full listing detail: host, every review and rating statistics.
    pub fn get(&self, id: ListingId) -> ServiceResult<ListingRepr> {
        let listing = self
            .listings
            .get_listing(id)?
            .ok_or(ServiceError::NotFound {
                entity: "listing",
                id,
            })?;
        let host = load_user_repr(&self.users, listing.host_id)?;

        let reviews = self.reviews.list_reviews_for_listing(id)?;
        let ratings = RatingSummary::from_reviews(&reviews);
        let reviews = reviews
            .iter()
            .map(|review| -> ServiceResult<ReviewRepr> {
                let user = load_user_repr(&self.users, review.user_id)?;
                Ok(ReviewRepr::new(review, user))
            })
            .collect::<ServiceResult<Vec<_>>>()?;

        Ok(ListingRepr::new(&listing, host, reviews, ratings))
    }

    pub fn list(&self, query: &ListingListQuery) -> ServiceResult<Vec<ListingSummary>> {
        self.listings
            .list_listings(query)?
            .iter()
            .map(|listing| load_listing_summary(&self.users, &self.reviews, listing))
            .collect()
    }
}
