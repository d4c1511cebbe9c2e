//! Half-open stay ranges.
//!
//! # Invariants
//! - A `Stay` always satisfies `check_in < check_out`.
//! - The check-out day is not occupied: `[check_in, check_out)`.
//! - Both ends fall in years 1 through 9999, where `YYYY-MM-DD` text sorts
//!   in date order.

use crate::model::validation::{ValidationError, ValidationResult};
use chrono::{Datelike, NaiveDate};

/// Occupied nights of one booking, `[check_in, check_out)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stay {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl Stay {
    /// Builds a stay, rejecting ranges where check-out is not after check-in
    /// and dates outside the storable calendar.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> ValidationResult<Self> {
        if check_out <= check_in {
            return Err(ValidationError::CheckOutNotAfterCheckIn {
                check_in,
                check_out,
            });
        }
        check_storable("check_in_date", check_in)?;
        check_storable("check_out_date", check_out)?;
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights; always at least 1.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Half-open overlap: `[a, b)` and `[c, d)` intersect iff `a < d && c < b`.
    ///
    /// Back-to-back stays (one checks out the day the other checks in) do
    /// not overlap. The calendar queries in `repo::booking_repo` run the same
    /// predicate in SQL.
    pub fn overlaps(&self, other: &Stay) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

fn check_storable(field: &'static str, date: NaiveDate) -> ValidationResult<()> {
    if !(1..=9999).contains(&date.year()) {
        return Err(ValidationError::DateOutOfRange { field, date });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Stay;
    use crate::model::validation::ValidationError;
    use chrono::{Datelike, NaiveDate};

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2031, month, day).unwrap()
    }

    #[test]
    fn same_day_checkout_is_rejected() {
        let err = Stay::new(day(1, 1), day(1, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::CheckOutNotAfterCheckIn { .. }));
        assert!(Stay::new(day(1, 2), day(1, 1)).is_err());
    }

    #[test]
    fn one_night_stay_is_accepted() {
        let stay = Stay::new(day(1, 1), day(1, 2)).unwrap();
        assert_eq!(stay.nights(), 1);
    }

    #[test]
    fn overlapping_stays_conflict() {
        let first = Stay::new(day(1, 1), day(1, 5)).unwrap();
        let second = Stay::new(day(1, 4), day(1, 8)).unwrap();
        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
    }

    #[test]
    fn back_to_back_stays_do_not_conflict() {
        let first = Stay::new(day(1, 1), day(1, 5)).unwrap();
        let second = Stay::new(day(1, 5), day(1, 8)).unwrap();
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn enclosing_stay_conflicts() {
        let outer = Stay::new(day(1, 1), day(1, 31)).unwrap();
        let inner = Stay::new(day(1, 10), day(1, 11)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn nights_span_month_boundary() {
        let stay = Stay::new(day(1, 30), day(2, 2)).unwrap();
        assert_eq!(stay.nights(), 3);
    }

    #[test]
    fn years_past_9999_are_rejected() {
        let far = NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
        let err = Stay::new(day(1, 1), far).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DateOutOfRange {
                field: "check_out_date",
                date: far,
            }
        );
        assert_eq!(err.field(), Some("check_out_date"));
    }

    #[test]
    fn years_before_one_are_rejected() {
        let ancient = NaiveDate::from_ymd_opt(0, 12, 31).unwrap();
        let err = Stay::new(ancient, day(1, 1)).unwrap_err();
        assert_eq!(err.field(), Some("check_in_date"));
        assert_eq!(
            err.to_string(),
            "Date must be between 0001-01-01 and 9999-12-31."
        );
    }

    #[test]
    fn last_storable_day_is_accepted() {
        let stay = Stay::new(
            NaiveDate::from_ymd_opt(9999, 12, 30).unwrap(),
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
        )
        .unwrap();
        assert_eq!(stay.nights(), 1);
    }
}
