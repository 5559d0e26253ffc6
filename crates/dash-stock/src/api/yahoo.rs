//! Yahoo Finance market data client
//!
//! Price bars come from the `yahoo_finance_api` connector. Company profile,
//! holders, headlines and corporate actions are read from the raw JSON
//! endpoints, which need the cookie and crumb handled by [`YahooSession`].

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use super::session::YahooSession;
use super::{MarketDataClient, RemoteResult, parse};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, RemoteDataError, Result};
use crate::model::{
    CompanyProfile, CorporateAction, DateRange, HolderRecord, NewsItem, PriceBar, TickerSymbol,
};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const PROVIDER: &str = "Yahoo Finance";
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance implementation of [`MarketDataClient`]
pub struct YahooFinanceClient {
    http: Client,
    connector: yahoo::YahooConnector,
    session: YahooSession,
    rate_limiter: SharedRateLimiter,
    timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a client honoring the timeout, quota and user agent of `config`
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DashboardError::Config(format!("failed to build HTTP client: {e}")))?;

        let connector = yahoo::YahooConnector::new()
            .map_err(|e| DashboardError::Config(format!("failed to build Yahoo connector: {e}")))?;

        let rate = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rate)));

        Ok(Self {
            http,
            connector,
            session: YahooSession::new(),
            rate_limiter,
            timeout: config.request_timeout,
        })
    }

    /// Run a connector call under the rate limiter and timeout
    async fn connector_call<F>(&self, endpoint: &str, call: F) -> RemoteResult<yahoo::YResponse>
    where
        F: Future<Output = std::result::Result<yahoo::YResponse, yahoo::YahooError>>,
    {
        self.rate_limiter.until_ready().await;
        match tokio::time::timeout(self.timeout, call).await {
            Ok(response) => Ok(response?),
            Err(_) => Err(RemoteDataError::Timeout {
                endpoint: endpoint.to_string(),
            }),
        }
    }

    fn bars(symbol: &str, response: &yahoo::YResponse) -> RemoteResult<Vec<PriceBar>> {
        let quotes = response.quotes()?;
        let bars: Vec<PriceBar> = quotes.iter().filter_map(to_price_bar).collect();
        if bars.is_empty() {
            return Err(RemoteDataError::empty(symbol, "price history"));
        }
        debug!(symbol, bars = bars.len(), "fetched price bars");
        Ok(bars)
    }

    /// GET a JSON endpoint without authentication
    async fn get_json(
        &self,
        symbol: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> RemoteResult<Value> {
        self.rate_limiter.until_ready().await;
        let response = self.http.get(url).query(query).send().await?;
        let response = check_status(response, symbol)?;
        Ok(response.json().await?)
    }

    /// GET a JSON endpoint that requires the crumb, refreshing it once on 401
    async fn get_authenticated(
        &self,
        symbol: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> RemoteResult<Value> {
        for attempt in 0..2 {
            let crumb = self.session.crumb(&self.http).await?;
            self.rate_limiter.until_ready().await;

            let response = self
                .http
                .get(url)
                .query(query)
                .query(&[("crumb", crumb.as_str())])
                .send()
                .await?;

            if response.status() == StatusCode::UNAUTHORIZED && attempt == 0 {
                warn!(symbol, "Yahoo crumb rejected, refreshing session");
                self.session.invalidate().await;
                continue;
            }

            let response = check_status(response, symbol)?;
            return Ok(response.json().await?);
        }

        Err(RemoteDataError::Network(format!(
            "{PROVIDER} rejected the session for {symbol}"
        )))
    }

    async fn quote_summary(&self, symbol: &str, modules: &str) -> RemoteResult<Value> {
        let url = format!("{SUMMARY_URL}/{symbol}");
        self.get_authenticated(symbol, &url, &[("modules", modules.to_string())])
            .await
    }
}

/// Map error statuses onto the provider error taxonomy
fn check_status(response: Response, symbol: &str) -> RemoteResult<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(RemoteDataError::UnknownTicker(symbol.to_string())),
        StatusCode::TOO_MANY_REQUESTS => Err(RemoteDataError::RateLimited {
            provider: PROVIDER.to_string(),
        }),
        status => Err(RemoteDataError::Network(format!(
            "{PROVIDER} returned {status} for {symbol}"
        ))),
    }
}

fn bar_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

fn to_price_bar(quote: &yahoo::Quote) -> Option<PriceBar> {
    if !quote.close.is_finite() {
        return None;
    }
    let date = bar_date(quote.timestamp as i64)?;
    Some(PriceBar {
        date,
        open: quote.open,
        high: quote.high,
        low: quote.low,
        close: quote.close,
        adjusted_close: quote.adjclose,
        volume: quote.volume,
    })
}

/// Midnight UTC of `date` as the connector's time type
fn to_offset_datetime(date: NaiveDate) -> RemoteResult<OffsetDateTime> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| RemoteDataError::Schema(format!("invalid date {date}")))?
        .and_utc();
    OffsetDateTime::from_unix_timestamp(midnight.timestamp())
        .map_err(|e| RemoteDataError::Schema(format!("invalid timestamp for {date}: {e}")))
}

#[async_trait]
impl MarketDataClient for YahooFinanceClient {
    async fn fetch_profile(&self, ticker: &TickerSymbol) -> RemoteResult<CompanyProfile> {
        let symbol = ticker.as_str();
        let body = self
            .quote_summary(symbol, &parse::PROFILE_MODULES.join(","))
            .await?;
        let result = parse::summary_result(&body, symbol)?;
        let profile = parse::profile_from_info(&parse::flatten_summary(result));
        debug!(symbol, name = ?profile.name, "fetched company profile");
        Ok(profile)
    }

    async fn fetch_daily_history(
        &self,
        ticker: &TickerSymbol,
        range: &DateRange,
    ) -> RemoteResult<Vec<PriceBar>> {
        let symbol = ticker.as_str();
        let start = to_offset_datetime(range.start())?;
        let end = to_offset_datetime(range.end())?;
        let response = self
            .connector_call(
                "chart/history",
                self.connector.get_quote_history(symbol, start, end),
            )
            .await?;
        Self::bars(symbol, &response)
    }

    async fn fetch_trailing_year(&self, ticker: &TickerSymbol) -> RemoteResult<Vec<PriceBar>> {
        let symbol = ticker.as_str();
        let response = self
            .connector_call(
                "chart/1y",
                self.connector.get_quote_range(symbol, "1d", "1y"),
            )
            .await?;
        Self::bars(symbol, &response)
    }

    async fn fetch_latest_session(&self, ticker: &TickerSymbol) -> RemoteResult<Vec<PriceBar>> {
        let symbol = ticker.as_str();
        let response = self
            .connector_call(
                "chart/1d",
                self.connector.get_quote_range(symbol, "1d", "1d"),
            )
            .await?;
        Self::bars(symbol, &response)
    }

    async fn fetch_recent_news(
        &self,
        ticker: &TickerSymbol,
        limit: usize,
    ) -> RemoteResult<Vec<NewsItem>> {
        let symbol = ticker.as_str();
        let query = [
            ("q", symbol.to_string()),
            ("quotesCount", "0".to_string()),
            ("newsCount", limit.to_string()),
        ];
        let body = self.get_json(symbol, SEARCH_URL, &query).await?;
        let news = parse::parse_news(&body, limit);
        debug!(symbol, headlines = news.len(), "fetched news");
        Ok(news)
    }

    async fn fetch_institutional_holders(
        &self,
        ticker: &TickerSymbol,
    ) -> RemoteResult<Vec<HolderRecord>> {
        let symbol = ticker.as_str();
        let body = self.quote_summary(symbol, parse::HOLDERS_MODULE).await?;
        let result = parse::summary_result(&body, symbol)?;
        let holders = parse::parse_holders(result);
        debug!(symbol, holders = holders.len(), "fetched institutional holders");
        Ok(holders)
    }

    async fn fetch_corporate_actions(
        &self,
        ticker: &TickerSymbol,
    ) -> RemoteResult<Vec<CorporateAction>> {
        let symbol = ticker.as_str();
        let url = format!("{CHART_URL}/{symbol}");
        let query = [
            ("range", "max".to_string()),
            ("interval", "1mo".to_string()),
            ("events", "div|split".to_string()),
        ];
        let body = self.get_json(symbol, &url, &query).await?;
        let actions = parse::parse_actions(&body, symbol)?;
        debug!(symbol, actions = actions.len(), "fetched corporate actions");
        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> YahooFinanceClient {
        YahooFinanceClient::new(&DashboardConfig::default()).unwrap()
    }

    #[test]
    fn test_to_offset_datetime() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let odt = to_offset_datetime(date).unwrap();
        assert_eq!(odt.unix_timestamp(), 1_709_251_200);
    }

    #[test]
    fn test_bar_date_uses_utc_day() {
        // 2024-03-01 14:30 UTC, a regular US session open
        assert_eq!(
            bar_date(1_709_303_400),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = DashboardConfig {
            requests_per_minute: 0,
            ..DashboardConfig::default()
        };
        assert!(matches!(
            YahooFinanceClient::new(&config),
            Err(DashboardError::Config(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_profile() {
        let ticker = TickerSymbol::parse("AAPL").unwrap();
        let profile = client().fetch_profile(&ticker).await.unwrap();
        assert!(profile.name.is_some());
        assert!(profile.market_cap.unwrap_or_default() > 0.0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_daily_history() {
        let ticker = TickerSymbol::parse("MSFT").unwrap();
        let range = DateRange::new_unchecked(
            NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
        );
        let bars = client().fetch_daily_history(&ticker, &range).await.unwrap();
        assert!(bars.len() > 15);
        assert!(bars.iter().all(|b| b.date < range.end()));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_recent_news() {
        let ticker = TickerSymbol::parse("AAPL").unwrap();
        let news = client().fetch_recent_news(&ticker, 5).await.unwrap();
        assert!(news.len() <= 5);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_unknown_ticker() {
        let ticker = TickerSymbol::parse("NOSUCHTICKERZZ").unwrap();
        let result = client().fetch_profile(&ticker).await;
        assert!(result.is_err());
    }
}
