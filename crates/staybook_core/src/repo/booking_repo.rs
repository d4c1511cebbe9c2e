//! Booking persistence and calendar conflict queries.
//!
//! # Invariants
//! - Dates are stored as `YYYY-MM-DD` text, so lexical comparison in SQL is
//!   chronological comparison.
//! - Overlap uses half-open ranges: an existing booking conflicts with
//!   `[check_in, check_out)` iff `existing.check_in < check_out AND
//!   existing.check_out > check_in`.
//! - Writes that leave a booking in a blocking status fail with
//!   `RepoError::BookingConflict` when the overlap test matches another row.
//!   The test runs inside the same statement as the write.

use crate::model::booking::{Booking, BookingId, BookingStatus};
use crate::model::listing::ListingId;
use crate::model::stay::Stay;
use crate::model::user::UserId;
use crate::repo::{
    blocking_status_sql, bool_to_int, parse_count, parse_decimal, parse_uuid, push_pagination,
    RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const BOOKING_SELECT_SQL: &str = "SELECT
    id,
    listing_id,
    user_id,
    check_in_date,
    check_out_date,
    guests,
    total_price,
    status,
    special_requests,
    created_at,
    updated_at
FROM bookings";

/// Filter and pagination options for booking lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingListQuery {
    pub listing_id: Option<ListingId>,
    pub user_id: Option<UserId>,
    pub status: Option<BookingStatus>,
    pub limit: Option<u32>,
    pub offset: u32,
}

pub trait BookingRepository {
    /// Inserts a booking unless an active booking overlaps its stay.
    fn create_booking(&self, booking: &Booking) -> RepoResult<BookingId>;
    /// Rewrites a booking unless another active booking overlaps its stay.
    fn update_booking(&self, booking: &Booking) -> RepoResult<()>;
    fn get_booking(&self, id: BookingId) -> RepoResult<Option<Booking>>;
    fn list_bookings(&self, query: &BookingListQuery) -> RepoResult<Vec<Booking>>;
    /// Returns ids of pending/confirmed bookings on `listing_id` overlapping
    /// `stay`, ignoring `exclude`.
    fn find_conflicts(
        &self,
        listing_id: ListingId,
        stay: &Stay,
        exclude: Option<BookingId>,
    ) -> RepoResult<Vec<BookingId>>;
    /// Moves a booking to `status`, re-checking the calendar when the new
    /// status blocks dates.
    fn set_status(&self, id: BookingId, status: BookingStatus) -> RepoResult<()>;
}

pub struct SqliteBookingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookingRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn booking_exists(&self, id: BookingId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn not_found_or_conflict(&self, id: BookingId, listing_id: ListingId) -> RepoResult<()> {
        if self.booking_exists(id)? {
            Err(RepoError::BookingConflict { listing_id })
        } else {
            Err(RepoError::NotFound {
                entity: "booking",
                id,
            })
        }
    }
}

impl BookingRepository for SqliteBookingRepository<'_> {
    fn create_booking(&self, booking: &Booking) -> RepoResult<BookingId> {
        booking.validate()?;

        let sql = format!(
            "INSERT INTO bookings (
                id,
                listing_id,
                user_id,
                check_in_date,
                check_out_date,
                guests,
                total_price,
                status,
                special_requests
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
            WHERE ?10 = 0 OR NOT EXISTS (
                SELECT 1
                FROM bookings
                WHERE listing_id = ?2
                  AND status IN ({statuses})
                  AND check_in_date < ?5
                  AND check_out_date > ?4
            );",
            statuses = blocking_status_sql()
        );
        let inserted = self.conn.execute(
            &sql,
            params![
                booking.id.to_string(),
                booking.listing_id.to_string(),
                booking.user_id.to_string(),
                booking.check_in_date,
                booking.check_out_date,
                booking.guests,
                booking.total_price.to_string(),
                booking.status.as_str(),
                booking.special_requests.as_str(),
                bool_to_int(booking.status.blocks_dates()),
            ],
        )?;

        if inserted == 0 {
            return Err(RepoError::BookingConflict {
                listing_id: booking.listing_id,
            });
        }
        Ok(booking.id)
    }

    fn update_booking(&self, booking: &Booking) -> RepoResult<()> {
        booking.validate()?;

        let sql = format!(
            "UPDATE bookings
             SET
                listing_id = ?2,
                user_id = ?3,
                check_in_date = ?4,
                check_out_date = ?5,
                guests = ?6,
                total_price = ?7,
                status = ?8,
                special_requests = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND (?10 = 0 OR NOT EXISTS (
                    SELECT 1
                    FROM bookings other
                    WHERE other.id != ?1
                      AND other.listing_id = ?2
                      AND other.status IN ({statuses})
                      AND other.check_in_date < ?5
                      AND other.check_out_date > ?4
               ));",
            statuses = blocking_status_sql()
        );
        let changed = self.conn.execute(
            &sql,
            params![
                booking.id.to_string(),
                booking.listing_id.to_string(),
                booking.user_id.to_string(),
                booking.check_in_date,
                booking.check_out_date,
                booking.guests,
                booking.total_price.to_string(),
                booking.status.as_str(),
                booking.special_requests.as_str(),
                bool_to_int(booking.status.blocks_dates()),
            ],
        )?;

        if changed == 0 {
            return self.not_found_or_conflict(booking.id, booking.listing_id);
        }
        Ok(())
    }

    fn get_booking(&self, id: BookingId) -> RepoResult<Option<Booking>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOKING_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_booking_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_bookings(&self, query: &BookingListQuery) -> RepoResult<Vec<Booking>> {
        let mut sql = format!("{BOOKING_SELECT_SQL} WHERE 1 = 1");
        let mut binds: Vec<Value> = Vec::new();

        if let Some(listing_id) = query.listing_id {
            sql.push_str(" AND listing_id = ?");
            binds.push(Value::Text(listing_id.to_string()));
        }
        if let Some(user_id) = query.user_id {
            sql.push_str(" AND user_id = ?");
            binds.push(Value::Text(user_id.to_string()));
        }
        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            binds.push(Value::Text(status.as_str().to_string()));
        }

        sql.push_str(" ORDER BY check_in_date ASC, id ASC");
        push_pagination(&mut sql, &mut binds, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut bookings = Vec::new();
        while let Some(row) = rows.next()? {
            bookings.push(parse_booking_row(row)?);
        }
        Ok(bookings)
    }

    fn find_conflicts(
        &self,
        listing_id: ListingId,
        stay: &Stay,
        exclude: Option<BookingId>,
    ) -> RepoResult<Vec<BookingId>> {
        let sql = format!(
            "SELECT id
             FROM bookings
             WHERE listing_id = ?1
               AND status IN ({statuses})
               AND check_in_date < ?3
               AND check_out_date > ?2
               AND (?4 IS NULL OR id != ?4)
             ORDER BY check_in_date ASC, id ASC;",
            statuses = blocking_status_sql()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![
            listing_id.to_string(),
            stay.check_in(),
            stay.check_out(),
            exclude.map(|id| id.to_string()),
        ])?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get(0)?;
            ids.push(parse_uuid(&id_text, "bookings.id")?);
        }
        Ok(ids)
    }

    fn set_status(&self, id: BookingId, status: BookingStatus) -> RepoResult<()> {
        let listing_id: Option<String> = self
            .conn
            .query_row(
                "SELECT listing_id FROM bookings WHERE id = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(listing_text) = listing_id else {
            return Err(RepoError::NotFound {
                entity: "booking",
                id,
            });
        };

        let sql = format!(
            "UPDATE bookings
             SET
                status = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND (?3 = 0 OR NOT EXISTS (
                    SELECT 1
                    FROM bookings other, bookings self_row
                    WHERE self_row.id = ?1
                      AND other.id != ?1
                      AND other.listing_id = self_row.listing_id
                      AND other.status IN ({statuses})
                      AND other.check_in_date < self_row.check_out_date
                      AND other.check_out_date > self_row.check_in_date
               ));",
            statuses = blocking_status_sql()
        );
        let changed = self.conn.execute(
            &sql,
            params![id.to_string(), status.as_str(), bool_to_int(status.blocks_dates())],
        )?;

        if changed == 0 {
            return Err(RepoError::BookingConflict {
                listing_id: parse_uuid(&listing_text, "bookings.listing_id")?,
            });
        }
        Ok(())
    }
}

fn parse_booking_row(row: &Row<'_>) -> RepoResult<Booking> {
    let id_text: String = row.get("id")?;
    let listing_text: String = row.get("listing_id")?;
    let user_text: String = row.get("user_id")?;
    let price_text: String = row.get("total_price")?;
    let status_text: String = row.get("status")?;

    let status = BookingStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in bookings.status"))
    })?;

    let booking = Booking {
        id: parse_uuid(&id_text, "bookings.id")?,
        listing_id: parse_uuid(&listing_text, "bookings.listing_id")?,
        user_id: parse_uuid(&user_text, "bookings.user_id")?,
        check_in_date: row.get::<_, NaiveDate>("check_in_date")?,
        check_out_date: row.get::<_, NaiveDate>("check_out_date")?,
        guests: parse_count(row.get("guests")?, "bookings.guests")?,
        total_price: parse_decimal(&price_text, "bookings.total_price")?,
        status,
        special_requests: row.get("special_requests")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    booking.validate()?;
    Ok(booking)
}
