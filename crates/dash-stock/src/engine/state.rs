//! Request and result types of one dashboard trigger

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::SentimentSummary;
use crate::model::{
    CompanyProfile, CorporateAction, DailySnapshot, DateRange, Fetched, HolderRecord, NewsItem,
    PriceBar, TickerSymbol,
};

/// User input as entered: free-text ticker plus start and end dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DashboardRequest {
    pub fn new(ticker: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            start,
            end,
        }
    }
}

/// Everything fetched and computed for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub ticker: TickerSymbol,
    pub range: DateRange,

    /// Always present; fields are missing when the provider call failed
    pub profile: CompanyProfile,
    /// Why the profile is empty, if it is
    pub profile_error: Option<String>,

    pub history: Fetched<Vec<PriceBar>>,
    pub today: Fetched<DailySnapshot>,
    /// One-year compound annual growth rate
    pub cagr: Fetched<f64>,
    pub sentiment: Fetched<SentimentSummary>,
    /// Headlines for display, already truncated
    pub news: Fetched<Vec<NewsItem>>,
    /// Largest holders, already truncated
    pub holders: Fetched<Vec<HolderRecord>>,
    pub actions: Fetched<Vec<CorporateAction>>,
}

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AppState {
    /// Nothing triggered yet
    Idle,
    /// The input was refused before any fetch
    Rejected {
        ticker: String,
        /// Submitted dates, echoed back into the form
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        message: String,
    },
    Loaded(Box<DashboardData>),
}

impl AppState {
    pub fn data(&self) -> Option<&DashboardData> {
        match self {
            Self::Loaded(data) => Some(data),
            Self::Idle | Self::Rejected { .. } => None,
        }
    }
}
