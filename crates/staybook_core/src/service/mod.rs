//! Core use-case services.
//!
//! # Responsibility
//! - Run field and cross-field validation ahead of every write.
//! - Orchestrate repository calls and assemble representations.
//! - Keep view/CLI layers decoupled from storage details.
//!
//! # Invariants
//! - A rejected write changes nothing.
//! - Repository booking conflicts surface as
//!   `ValidationError::ListingUnavailable`, never as storage errors.

use crate::model::listing::{Listing, RatingSummary};
use crate::model::user::UserId;
use crate::model::validation::ValidationError;
use crate::repo::review_repo::ReviewRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::serializer::listing::ListingSummary;
use crate::serializer::user::UserRepr;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod booking_service;
pub mod listing_service;
pub mod pricing;
pub mod review_service;
pub mod user_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for rental use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected; message is user-facing.
    Validation(ValidationError),
    /// Addressed record does not exist.
    NotFound { entity: &'static str, id: Uuid },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Returns the validation error when this is a rejection of input.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::BookingConflict { .. } => {
                Self::Validation(ValidationError::ListingUnavailable)
            }
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

/// Loads a user for nesting into a representation.
pub(crate) fn load_user_repr<U: UserRepository>(users: &U, id: UserId) -> ServiceResult<UserRepr> {
    users
        .get_user(id)?
        .map(|user| UserRepr::from(&user))
        .ok_or(ServiceError::NotFound { entity: "user", id })
}

/// Builds the compact listing form, including host and average rating.
pub(crate) fn load_listing_summary<U, R>(
    users: &U,
    reviews: &R,
    listing: &Listing,
) -> ServiceResult<ListingSummary>
where
    U: UserRepository,
    R: ReviewRepository,
{
    let host = load_user_repr(users, listing.host_id)?;
    let ratings = RatingSummary::from_reviews(&reviews.list_reviews_for_listing(listing.id)?);
    Ok(ListingSummary::new(listing, host, ratings))
}
