//! Tw-screener - Taiwan stock screener built on the fund-flow trend and
//! bull/bear line oscillators

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::{RefreshService, StockStore};
use std::sync::Arc;
use types::StockInfo;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<StockStore>,
    pub refresh: Arc<RefreshService>,
    /// Screening universe.
    pub stocks: Arc<Vec<StockInfo>>,
}

// Re-export commonly used types
pub use services::signals::compute_indicators;
pub use types::*;
