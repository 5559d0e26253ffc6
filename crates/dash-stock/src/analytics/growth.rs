//! Compound annual growth rate

use crate::error::InsufficientDataError;

/// Approximate number of trading days in a year
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// CAGR of a chronological series of closing prices.
///
/// `(end / start)^(1 / years) - 1` with `years = len / 252`. Fails with
/// [`InsufficientDataError`] instead of producing `NaN` when the series has
/// fewer than two points, starts at a non-positive price, or ends at a
/// negative one.
pub fn compute_cagr(closes: &[f64]) -> Result<f64, InsufficientDataError> {
    let (Some(&start), Some(&end)) = (closes.first(), closes.last()) else {
        return Err(InsufficientDataError::TooFewPoints { found: 0 });
    };
    if closes.len() < 2 {
        return Err(InsufficientDataError::TooFewPoints { found: closes.len() });
    }
    if !(start.is_finite() && start > 0.0) {
        return Err(InsufficientDataError::NonPositiveStart { price: start });
    }
    if !(end.is_finite() && end >= 0.0) {
        return Err(InsufficientDataError::InvalidEndPrice { price: end });
    }

    let years = closes.len() as f64 / TRADING_DAYS_PER_YEAR;
    Ok((end / start).powf(1.0 / years) - 1.0)
}
