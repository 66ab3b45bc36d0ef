//! Amount calculation
//!
//! Pure functions computing a bill's charge from its trip parameters.
//! Hourly jobs are billed on elapsed time at a per-hour rate; count jobs
//! on a unit count at a per-unit rate.

use chrono::{DateTime, Utc};
use fieldbill_core::{AppError, AppResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Seconds per hour, as a Decimal
const SECONDS_PER_HOUR: Decimal = dec!(3600);

/// Compute the charge for an hourly job: `rate * elapsed hours`.
///
/// Elapsed time is measured to second precision, so partial hours are
/// billed fractionally. Rejects a negative rate and an end time before
/// the start time rather than producing a negative charge.
pub fn hourly_amount(
    rate: Decimal,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> AppResult<Decimal> {
    if rate < Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "rate must be non-negative, got {}",
            rate
        )));
    }

    if end_time < start_time {
        return Err(AppError::Validation(format!(
            "end_time {} precedes start_time {}",
            end_time, start_time
        )));
    }

    let elapsed_seconds = Decimal::from((end_time - start_time).num_seconds());

    Ok(rate * elapsed_seconds / SECONDS_PER_HOUR)
}

/// Compute the charge for a count job: `rate * count`.
///
/// Rejects a negative rate or count.
pub fn count_amount(rate: Decimal, count: Decimal) -> AppResult<Decimal> {
    if rate < Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "rate must be non-negative, got {}",
            rate
        )));
    }

    if count < Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "count must be non-negative, got {}",
            count
        )));
    }

    Ok(rate * count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_hourly_whole_hours() {
        let amount = hourly_amount(dec!(500), ts(8, 0), ts(11, 0)).unwrap();
        assert_eq!(amount, dec!(1500));
    }

    #[test]
    fn test_hourly_partial_hour() {
        // 90 minutes at 100/hour
        let amount = hourly_amount(dec!(100), ts(8, 0), ts(9, 30)).unwrap();
        assert_eq!(amount, dec!(150));
    }

    #[test]
    fn test_hourly_zero_duration() {
        let amount = hourly_amount(dec!(100), ts(8, 0), ts(8, 0)).unwrap();
        assert_eq!(amount, Decimal::ZERO);
    }

    #[test]
    fn test_hourly_monotonic_in_duration() {
        let one_hour = hourly_amount(dec!(250), ts(8, 0), ts(9, 0)).unwrap();
        let two_hours = hourly_amount(dec!(250), ts(8, 0), ts(10, 0)).unwrap();
        let three_hours = hourly_amount(dec!(250), ts(8, 0), ts(11, 0)).unwrap();
        assert!(one_hour < two_hours);
        assert!(two_hours < three_hours);
    }

    #[test]
    fn test_hourly_rejects_inverted_range() {
        let result = hourly_amount(dec!(100), ts(10, 0), ts(8, 0));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_hourly_rejects_negative_rate() {
        let result = hourly_amount(dec!(-1), ts(8, 0), ts(9, 0));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_count_amount() {
        assert_eq!(count_amount(dec!(150), dec!(4)).unwrap(), dec!(600));
        assert_eq!(count_amount(dec!(150), dec!(0)).unwrap(), dec!(0));
    }

    #[test]
    fn test_count_rejects_negative() {
        assert!(matches!(
            count_amount(dec!(-150), dec!(4)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            count_amount(dec!(150), dec!(-4)),
            Err(AppError::Validation(_))
        ));
    }
}
