//! Domain types shared by the provider, analytics and presentation layers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analytics::validate_date_range;
use crate::error::{DashboardError, DateRangeError, Result};

/// An uppercased ticker symbol such as `AAPL`.
///
/// Not checked against any exchange registry; only emptiness is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// Trim and uppercase user input
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(DashboardError::InvalidTicker(
                "ticker symbol must not be empty".to_string(),
            ));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A start date strictly before an end date.
///
/// Only produced by [`crate::analytics::validate_date_range`], which
/// deserialization goes through as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DateRangeError;

    fn try_from(raw: RawDateRange) -> std::result::Result<Self, Self::Error> {
        validate_date_range(raw.start, raw.end)
    }
}

impl DateRange {
    pub(crate) fn new_unchecked(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// One trading day of prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: u64,
}

/// Open, high, low and volume of the most recent session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl DailySnapshot {
    /// Snapshot of the last bar, `None` when there are no bars.
    pub fn from_bars(bars: &[PriceBar]) -> Option<Self> {
        bars.last().map(|bar| Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        })
    }
}

/// A provider news headline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: Option<String>,
    pub link: Option<String>,
}

/// An organization reported as owning shares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderRecord {
    pub holder_name: String,
    pub shares_held: u64,
    /// Fraction of outstanding shares, when reported
    pub percent_held: Option<f64>,
    pub reported: Option<NaiveDate>,
}

/// A company officer listed in the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyOfficer {
    pub name: String,
    pub title: Option<String>,
    pub age: Option<u32>,
    pub total_pay: Option<f64>,
}

/// Dividend or split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    Dividend { amount: f64 },
    Split { numerator: f64, denominator: f64 },
}

/// A dated corporate action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateAction {
    pub date: NaiveDate,
    pub kind: ActionKind,
}

/// Company metadata; every field may be missing independently
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub debt_to_equity: Option<f64>,
    pub ebitda_margin: Option<f64>,
    pub website: Option<String>,
    pub employees: Option<u64>,
    pub business_summary: Option<String>,
    pub country: Option<String>,
    pub officers: Vec<CompanyOfficer>,
}

impl CompanyProfile {
    /// Profile with every field absent, used when the provider call fails
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Outcome of one dashboard section's fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Fetched<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> Fetched<T> {
    pub fn unavailable(reason: impl fmt::Display) -> Self {
        Self::Unavailable {
            reason: reason.to_string(),
        }
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable { .. } => None,
        }
    }
}

impl<T, E: fmt::Display> From<std::result::Result<T, E>> for Fetched<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Available(value),
            Err(err) => Self::unavailable(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_deserialize_validates() {
        let parse = |start: &str, end: &str| {
            serde_json::from_value::<DateRange>(serde_json::json!({ "start": start, "end": end }))
        };

        let range = parse("2024-01-01", "2024-06-01").unwrap();
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let err = parse("2024-06-01", "2024-01-01").unwrap_err();
        assert!(err.to_string().contains("Start date must be earlier"));
        assert!(parse("2024-06-01", "2024-06-01").is_err());
    }

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            adjusted_close: close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_ticker_normalized() {
        let ticker = TickerSymbol::parse("  aapl ").unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
        assert_eq!(ticker.to_string(), "AAPL");
    }

    #[test]
    fn test_empty_ticker_rejected() {
        assert!(matches!(
            TickerSymbol::parse("   "),
            Err(DashboardError::InvalidTicker(_))
        ));
    }

    #[test]
    fn test_snapshot_uses_last_bar() {
        let bars = vec![bar(1, 10.0), bar(2, 12.5)];
        let snapshot = DailySnapshot::from_bars(&bars).unwrap();
        assert_eq!(snapshot.close, 12.5);
        assert_eq!(snapshot.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    }

    #[test]
    fn test_snapshot_of_empty_session() {
        assert!(DailySnapshot::from_bars(&[]).is_none());
    }

    #[test]
    fn test_fetched_from_result() {
        let ok: Fetched<u32> = Ok::<_, String>(3).into();
        assert_eq!(ok.available(), Some(&3));

        let err: Fetched<u32> = Err::<u32, _>("boom").into();
        assert_eq!(
            err,
            Fetched::Unavailable {
                reason: "boom".to_string()
            }
        );
    }
}
