//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Provide the ORM-style query interface: lookup-by-id, filtered lists,
//!   date-range conflict queries.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Write paths call the record's `validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Booking writes re-check calendar conflicts inside the write statement.

use crate::db::DbError;
use crate::model::booking::BookingStatus;
use crate::model::validation::ValidationError;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

pub mod booking_repo;
pub mod listing_repo;
pub mod review_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Record-level invariant failed before the write.
    Validation(ValidationError),
    Db(DbError),
    NotFound { entity: &'static str, id: Uuid },
    /// A stored row cannot be decoded into a valid record.
    InvalidData(String),
    /// Another active booking holds part of the stay.
    BookingConflict { listing_id: Uuid },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::BookingConflict { listing_id } => {
                write!(f, "booking conflict on listing {listing_id}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) | Self::BookingConflict { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// SQL list literal of the statuses that hold calendar dates.
pub(crate) fn blocking_status_sql() -> String {
    BookingStatus::BLOCKING
        .iter()
        .map(|status| format!("'{}'", status.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_decimal(value: &str, column: &str) -> RepoResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid decimal `{value}` in {column}")))
}

pub(crate) fn parse_count(value: i64, column: &str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid count `{value}` in {column}")))
}

pub(crate) fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

/// Appends `LIMIT`/`OFFSET` clauses with bound values.
pub(crate) fn push_pagination(
    sql: &mut String,
    binds: &mut Vec<rusqlite::types::Value>,
    limit: Option<u32>,
    offset: u32,
) {
    use rusqlite::types::Value;

    match limit {
        Some(limit) => {
            sql.push_str(" LIMIT ?");
            binds.push(Value::Integer(i64::from(limit)));
        }
        None if offset > 0 => sql.push_str(" LIMIT -1"),
        None => return,
    }
    if offset > 0 {
        sql.push_str(" OFFSET ?");
        binds.push(Value::Integer(i64::from(offset)));
    }
}
