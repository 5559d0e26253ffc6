//! The fetch-compute pipeline behind one trigger

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::state::{AppState, DashboardData, DashboardRequest};
use crate::analytics::{SentimentAnalyzer, SentimentSummary, compute_cagr, validate_date_range};
use crate::api::MarketDataClient;
use crate::config::DashboardConfig;
use crate::error::{RemoteDataError, Result};
use crate::model::{
    CompanyProfile, DailySnapshot, DateRange, Fetched, HolderRecord, NewsItem, PriceBar,
    TickerSymbol,
};

/// Stock dashboard over a market data provider.
///
/// Holds no state between triggers; every call to [`Dashboard::trigger`]
/// fetches and computes from scratch.
pub struct Dashboard<C> {
    client: C,
    config: Arc<DashboardConfig>,
    analyzer: SentimentAnalyzer,
}

impl<C: MarketDataClient> Dashboard<C> {
    pub fn new(client: C, config: Arc<DashboardConfig>) -> Self {
        Self {
            client,
            config,
            analyzer: SentimentAnalyzer::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Run one request and turn the outcome into a renderable state
    pub async fn trigger(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> AppState {
        self.run(&DashboardRequest::new(ticker, start, end)).await
    }

    /// Like [`trigger`](Self::trigger) for an already assembled request
    pub async fn run(&self, request: &DashboardRequest) -> AppState {
        match self.load(request).await {
            Ok(data) => AppState::Loaded(Box::new(data)),
            Err(err) => {
                warn!(ticker = %request.ticker, error = %err, "dashboard request rejected");
                AppState::Rejected {
                    ticker: request.ticker.trim().to_uppercase(),
                    start: Some(request.start),
                    end: Some(request.end),
                    message: err.to_string(),
                }
            }
        }
    }

    /// Validate the input, then fetch every section in turn.
    ///
    /// Only input errors are returned; provider failures degrade the
    /// affected section.
    pub async fn load(&self, request: &DashboardRequest) -> Result<DashboardData> {
        let ticker = TickerSymbol::parse(&request.ticker)?;
        let range = validate_date_range(request.start, request.end)?;

        info!(symbol = %ticker, start = %range.start(), end = %range.end(), "loading dashboard");

        let (profile, profile_error) = self.profile_section(&ticker).await;
        let history = self.history_section(&ticker, &range).await;
        let today = self.today_section(&ticker).await;
        let cagr = self.cagr_section(&ticker).await;
        let (sentiment, news) = self.news_sections(&ticker).await;
        let holders = self.holders_section(&ticker).await;
        let actions = degrade(
            "actions",
            &ticker,
            self.client.fetch_corporate_actions(&ticker).await,
        );

        Ok(DashboardData {
            ticker,
            range,
            profile,
            profile_error,
            history,
            today,
            cagr,
            sentiment,
            news,
            holders,
            actions,
        })
    }

    async fn profile_section(&self, ticker: &TickerSymbol) -> (CompanyProfile, Option<String>) {
        match self.client.fetch_profile(ticker).await {
            Ok(profile) => (profile, None),
            Err(err) => {
                warn!(symbol = %ticker, section = "profile", error = %err, "section unavailable");
                (CompanyProfile::unavailable(), Some(err.to_string()))
            }
        }
    }

    async fn history_section(
        &self,
        ticker: &TickerSymbol,
        range: &DateRange,
    ) -> Fetched<Vec<PriceBar>> {
        degrade(
            "history",
            ticker,
            self.client.fetch_daily_history(ticker, range).await,
        )
    }

    async fn today_section(&self, ticker: &TickerSymbol) -> Fetched<DailySnapshot> {
        let result = self.client.fetch_latest_session(ticker).await.and_then(|bars| {
            DailySnapshot::from_bars(&bars)
                .ok_or_else(|| RemoteDataError::empty(ticker.as_str(), "session"))
        });
        degrade("today", ticker, result)
    }

    async fn cagr_section(&self, ticker: &TickerSymbol) -> Fetched<f64> {
        let bars = match self.client.fetch_trailing_year(ticker).await {
            Ok(bars) => bars,
            Err(err) => return degrade("cagr", ticker, Err(err)),
        };
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        degrade("cagr", ticker, compute_cagr(&closes))
    }

    /// Sentiment is scored over every fetched headline; only the first few are listed
    async fn news_sections(
        &self,
        ticker: &TickerSymbol,
    ) -> (Fetched<SentimentSummary>, Fetched<Vec<NewsItem>>) {
        match self
            .client
            .fetch_recent_news(ticker, self.config.news_fetch_limit)
            .await
        {
            Ok(mut news) => {
                let titles: Vec<&str> = news.iter().map(|item| item.title.as_str()).collect();
                let summary = self.analyzer.summarize(&titles);
                debug!(
                    symbol = %ticker,
                    headlines = summary.headline_count,
                    compound = summary.score.compound,
                    "scored headlines"
                );

                news.truncate(self.config.news_display_limit);
                (Fetched::Available(summary), Fetched::Available(news))
            }
            Err(err) => {
                warn!(symbol = %ticker, section = "news", error = %err, "section unavailable");
                (Fetched::unavailable(&err), Fetched::unavailable(&err))
            }
        }
    }

    async fn holders_section(&self, ticker: &TickerSymbol) -> Fetched<Vec<HolderRecord>> {
        let result = self.client.fetch_institutional_holders(ticker).await;
        match degrade("holders", ticker, result) {
            Fetched::Available(mut holders) => {
                holders.truncate(self.config.holders_display_limit);
                Fetched::Available(holders)
            }
            unavailable => unavailable,
        }
    }
}

/// Convert a section result, logging the reason when it failed
fn degrade<T, E: std::fmt::Display>(
    section: &'static str,
    ticker: &TickerSymbol,
    result: std::result::Result<T, E>,
) -> Fetched<T> {
    if let Err(err) = &result {
        warn!(symbol = %ticker, section, error = %err, "section unavailable");
    }
    Fetched::from(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::SentimentScore;
    use crate::api::{MockMarketDataClient, RemoteResult};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: date(2024, 1, day),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            adjusted_close: close,
            volume: 1_000 * u64::from(day),
        }
    }

    /// 253 closes going from 100 to 121
    fn trailing_year() -> Vec<PriceBar> {
        let mut bars: Vec<PriceBar> = (0..252).map(|_| bar(2, 100.0)).collect();
        bars.push(bar(3, 121.0));
        bars
    }

    fn headlines(n: usize) -> Vec<NewsItem> {
        (0..n)
            .map(|i| NewsItem {
                title: format!("Shares rally on strong earnings {i}"),
                publisher: Some("Newswire".to_string()),
                link: Some(format!("https://example.com/{i}")),
            })
            .collect()
    }

    /// Canned provider answers; the default is a healthy provider
    struct Stub {
        profile: RemoteResult<CompanyProfile>,
        latest: RemoteResult<Vec<PriceBar>>,
        trailing: RemoteResult<Vec<PriceBar>>,
        news: RemoteResult<Vec<NewsItem>>,
        holders: RemoteResult<Vec<HolderRecord>>,
    }

    impl Default for Stub {
        fn default() -> Self {
            Self {
                profile: Ok(CompanyProfile {
                    name: Some("Apple Inc.".to_string()),
                    market_cap: Some(2.95e12),
                    sector: Some("Technology".to_string()),
                    ..CompanyProfile::default()
                }),
                latest: Ok(vec![bar(5, 190.0)]),
                trailing: Ok(trailing_year()),
                news: Ok(headlines(8)),
                holders: Ok((0..15)
                    .map(|i| HolderRecord {
                        holder_name: format!("Fund {i}"),
                        shares_held: 1_000_000 - i * 1_000,
                        percent_held: None,
                        reported: None,
                    })
                    .collect()),
            }
        }
    }

    impl Stub {
        fn into_client(self) -> MockMarketDataClient {
            let Self {
                profile,
                latest,
                trailing,
                news,
                holders,
            } = self;

            let mut client = MockMarketDataClient::new();
            client
                .expect_fetch_profile()
                .returning(move |_| profile.clone());
            client
                .expect_fetch_daily_history()
                .returning(|_, _| Ok(vec![bar(2, 180.0), bar(3, 182.5)]));
            client
                .expect_fetch_latest_session()
                .returning(move |_| latest.clone());
            client
                .expect_fetch_trailing_year()
                .returning(move |_| trailing.clone());
            client
                .expect_fetch_recent_news()
                .returning(move |_, _| news.clone());
            client
                .expect_fetch_institutional_holders()
                .returning(move |_| holders.clone());
            client
                .expect_fetch_corporate_actions()
                .returning(|_| Ok(Vec::new()));
            client
        }
    }

    fn dashboard(client: MockMarketDataClient) -> Dashboard<MockMarketDataClient> {
        Dashboard::new(client, Arc::new(DashboardConfig::default()))
    }

    async fn load(stub: Stub) -> DashboardData {
        let state = dashboard(stub.into_client())
            .trigger(" aapl ", date(2024, 1, 1), date(2024, 6, 1))
            .await;
        match state {
            AppState::Loaded(data) => *data,
            other => panic!("expected a loaded dashboard, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_range_makes_no_calls() {
        let mut client = MockMarketDataClient::new();
        client.expect_fetch_profile().never();
        client.expect_fetch_daily_history().never();
        client.expect_fetch_recent_news().never();

        let state = dashboard(client)
            .trigger("aapl", date(2024, 6, 1), date(2024, 6, 1))
            .await;

        match state {
            AppState::Rejected {
                ticker,
                start,
                end,
                message,
            } => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(start, Some(date(2024, 6, 1)));
                assert_eq!(end, Some(date(2024, 6, 1)));
                assert!(message.contains("Start date must be earlier"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let state = dashboard(MockMarketDataClient::new())
            .trigger("   ", date(2024, 1, 1), date(2024, 6, 1))
            .await;
        assert!(matches!(state, AppState::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_full_load() {
        let data = load(Stub::default()).await;

        assert_eq!(data.ticker.as_str(), "AAPL");
        assert_eq!(data.profile.name.as_deref(), Some("Apple Inc."));
        assert!(data.profile_error.is_none());
        assert_eq!(data.history.available().map(Vec::len), Some(2));
        assert_eq!(data.today.available().map(|s| s.close), Some(190.0));

        let cagr = *data.cagr.available().unwrap();
        assert!((cagr - 0.21).abs() < 0.01, "cagr = {cagr}");

        // all 8 headlines are scored, only 5 listed
        let sentiment = data.sentiment.available().unwrap();
        assert_eq!(sentiment.headline_count, 8);
        assert!(sentiment.score.compound > 0.0);
        assert_eq!(data.news.available().map(Vec::len), Some(5));
        assert_eq!(data.holders.available().map(Vec::len), Some(10));
        assert_eq!(data.actions.available().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_profile_failure_degrades_only_profile() {
        let data = load(Stub {
            profile: Err(RemoteDataError::UnknownTicker("AAPL".to_string())),
            ..Stub::default()
        })
        .await;

        assert_eq!(data.profile, CompanyProfile::unavailable());
        assert!(data.profile_error.as_deref().unwrap().contains("AAPL"));
        assert!(data.history.available().is_some());
        assert!(data.sentiment.available().is_some());
        assert!(data.holders.available().is_some());
    }

    #[tokio::test]
    async fn test_provider_failures_degrade_independently() {
        let data = load(Stub {
            latest: Ok(Vec::new()),
            trailing: Ok(vec![bar(2, 10.0)]),
            news: Err(RemoteDataError::RateLimited {
                provider: "Yahoo Finance".to_string(),
            }),
            holders: Err(RemoteDataError::Network("connection reset".to_string())),
            ..Stub::default()
        })
        .await;

        assert!(data.sentiment.available().is_none());
        assert!(data.news.available().is_none());
        assert!(data.holders.available().is_none());
        assert!(data.today.available().is_none());
        assert!(
            matches!(&data.cagr, Fetched::Unavailable { reason } if reason.contains("At least 2"))
        );
        assert!(data.history.available().is_some());
        assert!(data.profile_error.is_none());
    }

    #[tokio::test]
    async fn test_no_headlines_gives_zero_sentiment() {
        let data = load(Stub {
            news: Ok(Vec::new()),
            ..Stub::default()
        })
        .await;

        let sentiment = data.sentiment.available().copied().unwrap();
        assert_eq!(sentiment.headline_count, 0);
        assert_eq!(sentiment.score, SentimentScore::zero());
        assert_eq!(data.news, Fetched::Available(Vec::new()));
    }

    #[tokio::test]
    async fn test_repeated_trigger_is_identical() {
        let dashboard = dashboard(Stub::default().into_client());
        let first = dashboard
            .trigger("AAPL", date(2024, 1, 1), date(2024, 6, 1))
            .await;
        let second = dashboard
            .trigger("AAPL", date(2024, 1, 1), date(2024, 6, 1))
            .await;
        assert_eq!(first, second);
    }
}
