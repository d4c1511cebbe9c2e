//! Listing representations (full and nested) and write input.

use crate::model::listing::{Listing, ListingId, RatingSummary};
use crate::model::user::UserId;
use crate::serializer::format_timestamp;
use crate::serializer::review::ReviewRepr;
use crate::serializer::user::UserRepr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Full listing detail with host, reviews and rating statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRepr {
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
    pub host: UserRepr,
    pub reviews: Vec<ReviewRepr>,
    pub average_rating: Option<f64>,
    pub total_reviews: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl ListingRepr {
    pub fn new(
        listing: &Listing,
        host: UserRepr,
        reviews: Vec<ReviewRepr>,
        ratings: RatingSummary,
    ) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            price_per_night: listing.price_per_night,
            location: listing.location.clone(),
            property_type: listing.property_type.clone(),
            max_guests: listing.max_guests,
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            amenities: listing.amenities.clone(),
            available: listing.available,
            host,
            reviews,
            average_rating: ratings.average_rating,
            total_reviews: ratings.total_reviews,
            created_at: format_timestamp(listing.created_at),
            updated_at: format_timestamp(listing.updated_at),
        }
    }
}

/// Compact listing used inside booking representations and search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingSummary {
    pub id: ListingId,
    pub title: String,
    pub price_per_night: Decimal,
    pub location: String,
    pub property_type: String,
    pub max_guests: u32,
    pub host: UserRepr,
    pub average_rating: Option<f64>,
}

impl ListingSummary {
    pub fn new(listing: &Listing, host: UserRepr, ratings: RatingSummary) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            price_per_night: listing.price_per_night,
            location: listing.location.clone(),
            property_type: listing.property_type.clone(),
            max_guests: listing.max_guests,
            host,
            average_rating: ratings.average_rating,
        }
    }
}

/// Incoming listing payload for create and full update.
///
/// `amenities` stays raw JSON and `max_guests` stays signed so the field
/// validators, not the deserializer, decide what is acceptable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListingInput {
    pub host_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price_per_night: Decimal,
    pub location: String,
    #[serde(default)]
    pub property_type: String,
    pub max_guests: i64,
    #[serde(default = "default_room_count")]
    pub bedrooms: u32,
    #[serde(default = "default_room_count")]
    pub bathrooms: u32,
    #[serde(default = "default_amenities")]
    pub amenities: Value,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_room_count() -> u32 {
    1
}

fn default_amenities() -> Value {
    Value::Array(Vec::new())
}

fn default_available() -> bool {
    true
}
