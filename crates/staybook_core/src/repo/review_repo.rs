//! Review persistence over the `reviews` table.
//!
//! Reviews reach a listing through their booking; listing-level queries
//! join on `bookings`.

use crate::model::listing::ListingId;
use crate::model::review::{Review, ReviewId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const REVIEW_COLUMNS: &str =
    "r.id, r.booking_id, r.user_id, r.rating, r.comment, r.created_at, r.updated_at";

pub trait ReviewRepository {
    fn create_review(&self, review: &Review) -> RepoResult<ReviewId>;
    fn update_review(&self, review: &Review) -> RepoResult<()>;
    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    /// Returns reviews on any booking of `listing_id`, oldest first.
    fn list_reviews_for_listing(&self, listing_id: ListingId) -> RepoResult<Vec<Review>>;
}

pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn create_review(&self, review: &Review) -> RepoResult<ReviewId> {
        review.validate()?;
        self.conn.execute(
            "INSERT INTO reviews (id, booking_id, user_id, rating, comment)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                review.id.to_string(),
                review.booking_id.to_string(),
                review.user_id.to_string(),
                review.rating,
                review.comment.as_str(),
            ],
        )?;
        Ok(review.id)
    }

    fn update_review(&self, review: &Review) -> RepoResult<()> {
        review.validate()?;
        let changed = self.conn.execute(
            "UPDATE reviews
             SET
                booking_id = ?2,
                user_id = ?3,
                rating = ?4,
                comment = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                review.id.to_string(),
                review.booking_id.to_string(),
                review.user_id.to_string(),
                review.rating,
                review.comment.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "review",
                id: review.id,
            });
        }
        Ok(())
    }

    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.id = ?1;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_review_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_reviews_for_listing(&self, listing_id: ListingId) -> RepoResult<Vec<Review>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS}
             FROM reviews r
             INNER JOIN bookings b ON b.id = r.booking_id
             WHERE b.listing_id = ?1
             ORDER BY r.created_at ASC, r.id ASC;"
        ))?;
        let mut rows = stmt.query([listing_id.to_string()])?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(parse_review_row(row)?);
        }
        Ok(reviews)
    }
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<Review> {
    let id_text: String = row.get(0)?;
    let booking_text: String = row.get(1)?;
    let user_text: String = row.get(2)?;
    let rating: i64 = row.get(3)?;

    let review = Review {
        id: parse_uuid(&id_text, "reviews.id")?,
        booking_id: parse_uuid(&booking_text, "reviews.booking_id")?,
        user_id: parse_uuid(&user_text, "reviews.user_id")?,
        rating: u8::try_from(rating).map_err(|_| {
            RepoError::InvalidData(format!("invalid rating `{rating}` in reviews.rating"))
        })?,
        comment: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    };
    review.validate()?;
    Ok(review)
}
