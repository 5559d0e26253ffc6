//! Pure analytics over provider data
//!
//! Nothing here performs I/O: date validation, compound growth and headline
//! sentiment are plain functions over already fetched values.

pub mod dates;
pub mod growth;
pub mod lexicon;
pub mod sentiment;

pub use dates::validate_date_range;
pub use growth::{TRADING_DAYS_PER_YEAR, compute_cagr};
pub use sentiment::{
    SentimentAnalyzer, SentimentScore, SentimentSummary, average_sentiment, try_average_sentiment,
};
