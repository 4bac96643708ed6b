pub mod keep_alive;
pub mod refresh;
pub mod signals;
pub mod stock_store;

pub use keep_alive::spawn_keep_alive;
pub use refresh::{RefreshService, RefreshSummary};
pub use signals::{compute_indicators, InsufficientDataError, MIN_DATA_POINTS};
pub use stock_store::StockStore;
