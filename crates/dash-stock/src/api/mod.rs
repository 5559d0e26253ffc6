//! Market data provider boundary
//!
//! [`MarketDataClient`] is everything the dashboard needs from a provider.
//! Every call may fail with a [`RemoteDataError`]; callers degrade the affected
//! section instead of aborting.

pub mod parse;
pub mod session;
pub mod yahoo;

use async_trait::async_trait;

use crate::error::RemoteDataError;
use crate::model::{
    CompanyProfile, CorporateAction, DateRange, HolderRecord, NewsItem, PriceBar, TickerSymbol,
};

pub use yahoo::YahooFinanceClient;

/// Result of a provider call
pub type RemoteResult<T> = std::result::Result<T, RemoteDataError>;

/// Source of market data for one ticker at a time
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Company metadata and officers
    async fn fetch_profile(&self, ticker: &TickerSymbol) -> RemoteResult<CompanyProfile>;

    /// Daily bars from `range.start()` up to, not including, `range.end()`
    async fn fetch_daily_history(
        &self,
        ticker: &TickerSymbol,
        range: &DateRange,
    ) -> RemoteResult<Vec<PriceBar>>;

    /// Daily bars of the trailing year
    async fn fetch_trailing_year(&self, ticker: &TickerSymbol) -> RemoteResult<Vec<PriceBar>>;

    /// Bars of the most recent trading session
    async fn fetch_latest_session(&self, ticker: &TickerSymbol) -> RemoteResult<Vec<PriceBar>>;

    /// Up to `limit` recent headlines, newest first
    async fn fetch_recent_news(
        &self,
        ticker: &TickerSymbol,
        limit: usize,
    ) -> RemoteResult<Vec<NewsItem>>;

    /// Institutional holders, largest first
    async fn fetch_institutional_holders(
        &self,
        ticker: &TickerSymbol,
    ) -> RemoteResult<Vec<HolderRecord>>;

    /// Dividends and splits, oldest first
    async fn fetch_corporate_actions(
        &self,
        ticker: &TickerSymbol,
    ) -> RemoteResult<Vec<CorporateAction>>;
}
