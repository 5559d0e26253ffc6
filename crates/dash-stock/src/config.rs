//! Configuration for dashboard requests

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding the per-call timeout in seconds
pub const ENV_REQUEST_TIMEOUT: &str = "STOCKDASH_REQUEST_TIMEOUT_SECS";
/// Environment variable overriding how many headlines are scored
pub const ENV_NEWS_LIMIT: &str = "STOCKDASH_NEWS_LIMIT";
/// Environment variable overriding the provider requests-per-minute quota
pub const ENV_RATE_LIMIT: &str = "STOCKDASH_RATE_LIMIT";

/// Configuration for a dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Timeout applied to every provider call
    pub request_timeout: Duration,

    /// Headlines fetched and scored for sentiment
    pub news_fetch_limit: usize,

    /// Headlines listed in the news tab
    pub news_display_limit: usize,

    /// Holders shown in the holders chart
    pub holders_display_limit: usize,

    /// Provider requests allowed per minute
    pub requests_per_minute: u32,

    /// User agent sent to the provider
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            news_fetch_limit: 20,
            news_display_limit: 5,
            holders_display_limit: 10,
            requests_per_minute: 60,
            user_agent: concat!("stockdash/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Apply `STOCKDASH_*` overrides from the environment
    pub fn with_env(self) -> Result<Self> {
        self.with_lookup(|name| std::env::var(name).ok())
    }

    fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout = Duration::from_secs(parse_number(ENV_REQUEST_TIMEOUT, &secs)?);
        }
        if let Some(limit) = lookup(ENV_NEWS_LIMIT) {
            self.news_fetch_limit = parse_number(ENV_NEWS_LIMIT, &limit)?;
        }
        if let Some(rate) = lookup(ENV_RATE_LIMIT) {
            self.requests_per_minute = parse_number(ENV_RATE_LIMIT, &rate)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(DashboardError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }
        if self.news_display_limit == 0 || self.holders_display_limit == 0 {
            return Err(DashboardError::Config(
                "display limits must be greater than 0".to_string(),
            ));
        }
        if self.requests_per_minute == 0 {
            return Err(DashboardError::Config(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| DashboardError::Config(format!("{name} must be a number, got {raw:?}")))
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    request_timeout: Option<Duration>,
    news_fetch_limit: Option<usize>,
    news_display_limit: Option<usize>,
    holders_display_limit: Option<usize>,
    requests_per_minute: Option<u32>,
    user_agent: Option<String>,
}

impl DashboardConfigBuilder {
    /// Set the per-call timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set how many headlines are scored
    pub fn news_fetch_limit(mut self, limit: usize) -> Self {
        self.news_fetch_limit = Some(limit);
        self
    }

    /// Set how many headlines are listed
    pub fn news_display_limit(mut self, limit: usize) -> Self {
        self.news_display_limit = Some(limit);
        self
    }

    /// Set how many holders are charted
    pub fn holders_display_limit(mut self, limit: usize) -> Self {
        self.holders_display_limit = Some(limit);
        self
    }

    /// Set the provider quota
    pub fn requests_per_minute(mut self, rate: u32) -> Self {
        self.requests_per_minute = Some(rate);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            news_fetch_limit: self.news_fetch_limit.unwrap_or(defaults.news_fetch_limit),
            news_display_limit: self.news_display_limit.unwrap_or(defaults.news_display_limit),
            holders_display_limit: self
                .holders_display_limit
                .unwrap_or(defaults.holders_display_limit),
            requests_per_minute: self.requests_per_minute.unwrap_or(defaults.requests_per_minute),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }
}
