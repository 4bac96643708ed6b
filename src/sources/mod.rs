//! Market data sources.

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::types::{PriceError, PricePoint};
use thiserror::Error;

/// Errors raised while fetching raw market data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("No data for {0}")]
    NoData(String),

    #[error(transparent)]
    InvalidBar(#[from] PriceError),
}

/// Provider of daily OHLC history for listed instruments.
#[axum::async_trait]
pub trait PriceSource: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Up to `days` most recent daily bars, oldest first.
    async fn daily_history(&self, code: &str, days: u32) -> Result<Vec<PricePoint>, SourceError>;

    /// Today's bar when the provider reports it separately from history.
    async fn current_bar(&self, _code: &str) -> Result<Option<PricePoint>, SourceError> {
        Ok(None)
    }
}
