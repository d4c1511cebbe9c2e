//! Listing persistence over the `listings` table.
//!
//! Amenities are stored as a JSON array in one text column; prices as
//! decimal text so no float rounding ever touches money.

use crate::model::listing::{Listing, ListingId};
use crate::repo::{
    bool_to_int, parse_count, parse_decimal, parse_flag, parse_uuid, push_pagination, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const LISTING_SELECT_SQL: &str = "SELECT
    id,
    host_id,
    title,
    description,
    price_per_night,
    location,
    property_type,
    max_guests,
    bedrooms,
    bathrooms,
    amenities,
    available,
    created_at,
    updated_at
FROM listings";

/// Filter and pagination options for listing search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingListQuery {
    /// Hide listings whose `available` flag is off.
    pub available_only: bool,
    /// Case-insensitive substring match on `location`.
    pub location: Option<String>,
    pub host_id: Option<uuid::Uuid>,
    pub limit: Option<u32>,
    pub offset: u32,
}

pub trait ListingRepository {
    fn create_listing(&self, listing: &Listing) -> RepoResult<ListingId>;
    fn update_listing(&self, listing: &Listing) -> RepoResult<()>;
    fn get_listing(&self, id: ListingId) -> RepoResult<Option<Listing>>;
    fn list_listings(&self, query: &ListingListQuery) -> RepoResult<Vec<Listing>>;
}

pub struct SqliteListingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListingRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ListingRepository for SqliteListingRepository<'_> {
    fn create_listing(&self, listing: &Listing) -> RepoResult<ListingId> {
        listing.validate()?;

        self.conn.execute(
            "INSERT INTO listings (
                id,
                host_id,
                title,
                description,
                price_per_night,
                location,
                property_type,
                max_guests,
                bedrooms,
                bathrooms,
                amenities,
                available
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                listing.id.to_string(),
                listing.host_id.to_string(),
                listing.title.as_str(),
                listing.description.as_str(),
                listing.price_per_night.to_string(),
                listing.location.as_str(),
                listing.property_type.as_str(),
                listing.max_guests,
                listing.bedrooms,
                listing.bathrooms,
                amenities_to_db(&listing.amenities)?,
                bool_to_int(listing.available),
            ],
        )?;

        Ok(listing.id)
    }

    fn update_listing(&self, listing: &Listing) -> RepoResult<()> {
        listing.validate()?;

        let changed = self.conn.execute(
            "UPDATE listings
             SET
                host_id = ?2,
                title = ?3,
                description = ?4,
                price_per_night = ?5,
                location = ?6,
                property_type = ?7,
                max_guests = ?8,
                bedrooms = ?9,
                bathrooms = ?10,
                amenities = ?11,
                available = ?12,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                listing.id.to_string(),
                listing.host_id.to_string(),
                listing.title.as_str(),
                listing.description.as_str(),
                listing.price_per_night.to_string(),
                listing.location.as_str(),
                listing.property_type.as_str(),
                listing.max_guests,
                listing.bedrooms,
                listing.bathrooms,
                amenities_to_db(&listing.amenities)?,
                bool_to_int(listing.available),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "listing",
                id: listing.id,
            });
        }
        Ok(())
    }

    fn get_listing(&self, id: ListingId) -> RepoResult<Option<Listing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LISTING_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_listing_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_listings(&self, query: &ListingListQuery) -> RepoResult<Vec<Listing>> {
        let mut sql = format!("{LISTING_SELECT_SQL} WHERE 1 = 1");
        let mut binds: Vec<Value> = Vec::new();

        if query.available_only {
            sql.push_str(" AND available = 1");
        }
        if let Some(location) = query.location.as_deref().map(str::trim) {
            if !location.is_empty() {
                sql.push_str(" AND location LIKE '%' || ? || '%'");
                binds.push(Value::Text(location.to_string()));
            }
        }
        if let Some(host_id) = query.host_id {
            sql.push_str(" AND host_id = ?");
            binds.push(Value::Text(host_id.to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");
        push_pagination(&mut sql, &mut binds, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut listings = Vec::new();
        while let Some(row) = rows.next()? {
            listings.push(parse_listing_row(row)?);
        }
        Ok(listings)
    }
}

fn parse_listing_row(row: &Row<'_>) -> RepoResult<Listing> {
    let id_text: String = row.get("id")?;
    let host_text: String = row.get("host_id")?;
    let price_text: String = row.get("price_per_night")?;
    let amenities_text: String = row.get("amenities")?;

    let listing = Listing {
        id: parse_uuid(&id_text, "listings.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        price_per_night: parse_decimal(&price_text, "listings.price_per_night")?,
        location: row.get("location")?,
        property_type: row.get("property_type")?,
        max_guests: parse_count(row.get("max_guests")?, "listings.max_guests")?,
        bedrooms: parse_count(row.get("bedrooms")?, "listings.bedrooms")?,
        bathrooms: parse_count(row.get("bathrooms")?, "listings.bathrooms")?,
        amenities: amenities_from_db(&amenities_text)?,
        available: parse_flag(row.get("available")?, "listings.available")?,
        host_id: parse_uuid(&host_text, "listings.host_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    listing.validate()?;
    Ok(listing)
}

fn amenities_to_db(amenities: &[String]) -> RepoResult<String> {
    serde_json::to_string(amenities)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode amenities: {err}")))
}

fn amenities_from_db(value: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid amenities `{value}` in listings.amenities"))
    })
}
