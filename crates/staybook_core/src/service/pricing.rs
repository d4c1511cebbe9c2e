//! Booking price calculation.

use crate::model::stay::Stay;
use crate::model::validation::{ValidationError, ValidationResult};
use rust_decimal::Decimal;

/// Returns `nights × price_per_night` with exact decimal arithmetic.
///
/// # Errors
/// - `ValidationError::TotalPriceTooLarge` when the product exceeds
///   `Decimal::MAX`.
pub fn total_price(price_per_night: Decimal, stay: &Stay) -> ValidationResult<Decimal> {
    price_per_night
        .checked_mul(Decimal::from(stay.nights()))
        .ok_or(ValidationError::TotalPriceTooLarge)
}

#[cfg(test)]
mod tests {
    use super::total_price;
    use crate::model::stay::Stay;
    use crate::model::validation::ValidationError;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2031, month, day).expect("valid date")
    }

    #[test]
    fn three_nights_at_one_hundred() {
        let stay = Stay::new(day(1, 1), day(1, 4)).expect("valid stay");
        assert_eq!(
            total_price(Decimal::new(100, 0), &stay),
            Ok(Decimal::new(300, 0))
        );
    }

    #[test]
    fn cents_are_kept_exact() {
        let stay = Stay::new(day(2, 27), day(3, 2)).expect("valid stay");
        // 2031 is not a leap year: three nights.
        assert_eq!(
            total_price(Decimal::new(8_999, 2), &stay),
            Ok(Decimal::new(26_997, 2))
        );
    }

    #[test]
    fn overflow_is_a_validation_error() {
        let stay = Stay::new(day(1, 1), day(1, 3)).expect("valid stay");
        assert_eq!(
            total_price(Decimal::MAX, &stay),
            Err(ValidationError::TotalPriceTooLarge)
        );
    }
}
