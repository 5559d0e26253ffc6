//! Single-page stock dashboard
//!
//! Given a ticker and a date range, this crate fetches market data from a
//! provider, derives a few analytics and maps everything to a display-ready
//! page description:
//!
//! - Price history, the latest session and the trailing year (Yahoo Finance)
//! - Company profile, officers, institutional holders and corporate actions
//! - Average headline sentiment from a lexicon and rule based scorer
//! - One-year compound annual growth rate
//!
//! # Architecture
//!
//! - [`api`]: the [`MarketDataClient`] boundary and its Yahoo implementation
//! - [`analytics`]: pure functions (date validation, CAGR, sentiment)
//! - [`engine`]: [`Dashboard`], which validates input first and then fetches
//!   each section in turn, degrading failed sections instead of aborting
//! - [`ui`]: [`ui::render`] from [`AppState`] to [`ui::UiDescription`], plus
//!   terminal and HTML layouts
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_stock::{Dashboard, DashboardConfig, YahooFinanceClient, ui};
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(DashboardConfig::default().with_env()?);
//!     let client = YahooFinanceClient::new(&config)?;
//!     let dashboard = Dashboard::new(client, config);
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
//!     let state = dashboard.trigger("AAPL", start, end).await;
//!
//!     println!("{}", ui::terminal::to_text(&ui::render(&state)));
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod ui;

pub use analytics::{
    SentimentAnalyzer, SentimentScore, SentimentSummary, average_sentiment, compute_cagr,
    try_average_sentiment, validate_date_range,
};
pub use api::{MarketDataClient, YahooFinanceClient};
pub use config::DashboardConfig;
pub use engine::{AppState, Dashboard, DashboardData, DashboardRequest};
pub use error::{
    DashboardError, DateRangeError, EmptyInputError, InsufficientDataError, RemoteDataError,
    Result,
};
pub use model::{
    ActionKind, CompanyOfficer, CompanyProfile, CorporateAction, DailySnapshot, DateRange, Fetched,
    HolderRecord, NewsItem, PriceBar, TickerSymbol,
};
