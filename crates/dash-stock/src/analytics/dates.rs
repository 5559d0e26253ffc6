//! Date range validation

use chrono::NaiveDate;

use crate::error::DateRangeError;
use crate::model::DateRange;

/// Check that `start` is strictly before `end`.
///
/// Run before any provider call; the returned [`DateRange`] is the only way
/// to ask a client for history.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<DateRange, DateRangeError> {
    if start >= end {
        return Err(DateRangeError::StartNotBeforeEnd { start, end });
    }
    Ok(DateRange::new_unchecked(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()
    }

    #[test]
    fn test_same_day_rejected() {
        assert_eq!(
            validate_date_range(day(), day()),
            Err(DateRangeError::StartNotBeforeEnd {
                start: day(),
                end: day()
            })
        );
    }

    #[test]
    fn test_reversed_rejected() {
        let next = day() + Days::new(1);
        assert!(validate_date_range(next, day()).is_err());
    }

    #[test]
    fn test_ordered_accepted() {
        let next = day() + Days::new(1);
        let range = validate_date_range(day(), next).unwrap();
        assert_eq!(range.start(), day());
        assert_eq!(range.end(), next);
    }
}
