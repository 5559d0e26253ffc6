//! Command-line interface for stockdash
//!
//! # Usage
//!
//! ```bash
//! # One dashboard, printed to the terminal
//! stockdash show --ticker AAPL --start 2024-01-01 --end 2024-06-30
//!
//! # Same, as the JSON page description
//! stockdash show -t AAPL -s 2024-01-01 -e 2024-06-30 --json
//!
//! # Prompt for ticker and dates until `exit`
//! stockdash interactive
//!
//! # Web front end
//! stockdash serve --addr 127.0.0.1:8080
//! ```

mod interactive;
mod server;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dash_stock::{Dashboard, DashboardConfig, YahooFinanceClient, ui};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stockdash", version)]
#[command(
    about = "Stock dashboard: prices, fundamentals, news sentiment and growth for one ticker",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print one dashboard
    Show {
        /// Company ticker, e.g. AAPL
        #[arg(short, long)]
        ticker: String,

        /// First day of the price chart (YYYY-MM-DD)
        #[arg(short, long)]
        start: NaiveDate,

        /// Day after the last day of the price chart (YYYY-MM-DD)
        #[arg(short, long)]
        end: NaiveDate,

        /// Print the page description as JSON instead of text
        #[arg(long, conflicts_with = "html")]
        json: bool,

        /// Print a standalone HTML page instead of text
        #[arg(long)]
        html: bool,
    },

    /// Prompt for ticker and dates repeatedly
    Interactive,

    /// Serve the dashboard over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = dash_utils::Config::from_env()?;
    dash_utils::init_tracing(&settings);

    let cli = Cli::parse();

    let config = Arc::new(DashboardConfig::default().with_env()?);
    let client = YahooFinanceClient::new(&config)?;
    let dashboard = Dashboard::new(client, config);

    info!(app = %settings.app_name, env = %settings.environment, "starting stockdash");

    match cli.command {
        Command::Show {
            ticker,
            start,
            end,
            json,
            html,
        } => {
            let page = ui::render(&dashboard.trigger(&ticker, start, end).await);
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else if html {
                println!("{}", ui::html::to_html(&page)?);
            } else {
                print!("{}", ui::terminal::to_text(&page));
            }
        }
        Command::Interactive => {
            let stdin = io::stdin();
            interactive::run(&dashboard, stdin.lock(), io::stdout()).await?;
        }
        Command::Serve { addr } => server::serve(Arc::new(dashboard), addr).await?,
    }

    Ok(())
}

#[cfg(test)]
mod test_support {
    use async_trait::async_trait;
    use dash_stock::api::RemoteResult;
    use dash_stock::{
        CompanyProfile, CorporateAction, Dashboard, DashboardConfig, DateRange, HolderRecord,
        MarketDataClient, NewsItem, PriceBar, RemoteDataError, TickerSymbol,
    };
    use std::sync::Arc;

    /// Provider that fails every call, as if the network were down
    pub struct OfflineClient;

    fn offline<T>() -> RemoteResult<T> {
        Err(RemoteDataError::Network("offline".to_string()))
    }

    #[async_trait]
    impl MarketDataClient for OfflineClient {
        async fn fetch_profile(&self, _: &TickerSymbol) -> RemoteResult<CompanyProfile> {
            offline()
        }

        async fn fetch_daily_history(
            &self,
            _: &TickerSymbol,
            _: &DateRange,
        ) -> RemoteResult<Vec<PriceBar>> {
            offline()
        }

        async fn fetch_trailing_year(&self, _: &TickerSymbol) -> RemoteResult<Vec<PriceBar>> {
            offline()
        }

        async fn fetch_latest_session(&self, _: &TickerSymbol) -> RemoteResult<Vec<PriceBar>> {
            offline()
        }

        async fn fetch_recent_news(
            &self,
            _: &TickerSymbol,
            _: usize,
        ) -> RemoteResult<Vec<NewsItem>> {
            offline()
        }

        async fn fetch_institutional_holders(
            &self,
            _: &TickerSymbol,
        ) -> RemoteResult<Vec<HolderRecord>> {
            offline()
        }

        async fn fetch_corporate_actions(
            &self,
            _: &TickerSymbol,
        ) -> RemoteResult<Vec<CorporateAction>> {
            offline()
        }
    }

    pub fn offline_dashboard() -> Dashboard<OfflineClient> {
        Dashboard::new(OfflineClient, Arc::new(DashboardConfig::default()))
    }
}
