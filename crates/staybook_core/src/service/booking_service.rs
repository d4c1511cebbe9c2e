//! Booking use-case service.
//!
//! # Responsibility
//! - Validate booking input against dates, capacity and the listing calendar.
//! - Price new bookings and persist them through the guarded repository.
//! - Render bookings with nested listing and guest.
//!
//! # Invariants
//! - Cross-field checks run in fixed order: date order, past check-in,
//!   listing and capacity, calendar overlap, guest reference. The first
//!   failure wins.
//! - `total_price` is set once at creation; updates keep it.
//! - Only pending/confirmed bookings hold calendar dates.

use crate::clock::Clock;
use crate::model::booking::{Booking, BookingId, BookingStatus};
use crate::model::listing::Listing;
use crate::model::stay::Stay;
use crate::model::validation::{validate_guests, ValidationError};
use crate::repo::booking_repo::{BookingListQuery, BookingRepository};
use crate::repo::listing_repo::ListingRepository;
use crate::repo::review_repo::ReviewRepository;
use crate::repo::user_repo::UserRepository;
use crate::serializer::booking::{BookingInput, BookingRepr, BookingSummary};
use crate::service::pricing::total_price;
use crate::service::{load_listing_summary, load_user_repr, ServiceError, ServiceResult};
use log::{info, warn};

/// Booking input that passed every check, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub listing: Listing,
    pub stay: Stay,
    pub guests: u32,
}

pub struct BookingService<L, B, U, R, C> {
    listings: L,
    bookings: B,
    users: U,
    reviews: R,
    clock: C,
}

impl<L, B, U, R, C> BookingService<L, B, U, R, C>
where
    L: ListingRepository,
    B: BookingRepository,
    U: UserRepository,
    R: ReviewRepository,
    C: Clock,
{
    pub fn new(listings: L, bookings: B, users: U, reviews: R, clock: C) -> Self {
        Self {
            listings,
            bookings,
            users,
            reviews,
            clock,
        }
    }

    /// Runs field and cross-field validation for `input`.
    ///
    /// `exclude` names the booking being updated so it does not conflict
    /// with its own dates.
    pub fn validate(
        &self,
        input: &BookingInput,
        exclude: Option<BookingId>,
    ) -> ServiceResult<ValidatedBooking> {
        let result = self.check(input, exclude);
        if let Err(ServiceError::Validation(err)) = &result {
            warn!(
                "event=booking_validate module=service status=rejected listing_id={} field={}",
                input.listing_id,
                err.field().unwrap_or("non_field")
            );
        }
        result
    }

    fn check(
        &self,
        input: &BookingInput,
        exclude: Option<BookingId>,
    ) -> ServiceResult<ValidatedBooking> {
        let guests = validate_guests(input.guests)?;

        let stay = Stay::new(input.check_in_date, input.check_out_date)?;

        let today = self.clock.today();
        if stay.check_in() < today {
            return Err(ValidationError::CheckInInPast {
                check_in: stay.check_in(),
                today,
            }
            .into());
        }

        let listing = self
            .listings
            .get_listing(input.listing_id)?
            .ok_or(ValidationError::InvalidListing(input.listing_id))?;
        if guests > listing.max_guests {
            return Err(ValidationError::GuestsExceedCapacity {
                guests,
                max_guests: listing.max_guests,
            }
            .into());
        }

        if !self
            .bookings
            .find_conflicts(listing.id, &stay, exclude)?
            .is_empty()
        {
            return Err(ValidationError::ListingUnavailable.into());
        }

        if self.users.get_user(input.user_id)?.is_none() {
            return Err(ValidationError::InvalidUser {
                field: "user_id",
                id: input.user_id,
            }
            .into());
        }

        Ok(ValidatedBooking {
            listing,
            stay,
            guests,
        })
    }

    /// Validates, prices and persists a new booking.
    pub fn create(&self, input: &BookingInput) -> ServiceResult<BookingRepr> {
        let validated = self.validate(input, None)?;
        let price = total_price(validated.listing.price_per_night, &validated.stay)?;

        let mut booking = Booking::new(
            validated.listing.id,
            input.user_id,
            validated.stay,
            validated.guests,
            price,
        );
        booking.status = input.status;
        booking.special_requests = input.special_requests.clone();

        let id = self.bookings.create_booking(&booking)?;
        info!(
            "event=booking_create module=service status=ok booking_id={id} listing_id={} nights={}",
            booking.listing_id,
            validated.stay.nights()
        );
        self.get(id)
    }

    /// Replaces a booking's editable fields, keeping its original price.
    pub fn update(&self, id: BookingId, input: &BookingInput) -> ServiceResult<BookingRepr> {
        let existing = self
            .bookings
            .get_booking(id)?
            .ok_or(ServiceError::NotFound {
                entity: "booking",
                id,
            })?;
        let validated = self.validate(input, Some(id))?;

        let booking = Booking {
            listing_id: validated.listing.id,
            user_id: input.user_id,
            check_in_date: validated.stay.check_in(),
            check_out_date: validated.stay.check_out(),
            guests: validated.guests,
            status: input.status,
            special_requests: input.special_requests.clone(),
            ..existing
        };
        self.bookings.update_booking(&booking)?;
        info!("event=booking_update module=service status=ok booking_id={id}");
        self.get(id)
    }

    pub fn get(&self, id: BookingId) -> ServiceResult<BookingRepr> {
        let booking = self
            .bookings
            .get_booking(id)?
            .ok_or(ServiceError::NotFound {
                entity: "booking",
                id,
            })?;
        let listing = self
            .listings
            .get_listing(booking.listing_id)?
            .ok_or(ServiceError::NotFound {
                entity: "listing",
                id: booking.listing_id,
            })?;

        let summary = load_listing_summary(&self.users, &self.reviews, &listing)?;
        let user = load_user_repr(&self.users, booking.user_id)?;
        Ok(BookingRepr::new(&booking, summary, user))
    }

    pub fn list(&self, query: &BookingListQuery) -> ServiceResult<Vec<BookingSummary>> {
        self.bookings
            .list_bookings(query)?
            .iter()
            .map(|booking| -> ServiceResult<BookingSummary> {
                let user = load_user_repr(&self.users, booking.user_id)?;
                Ok(BookingSummary::new(booking, user))
            })
            .collect()
    }

    /// Cancels a booking, releasing its dates.
    pub fn cancel(&self, id: BookingId) -> ServiceResult<BookingRepr> {
        self.bookings.set_status(id, BookingStatus::Cancelled)?;
        info!("event=booking_cancel module=service status=ok booking_id={id}");
        self.get(id)
    }
}
