use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tw_screener::config::Config;
use tw_screener::services::{spawn_keep_alive, RefreshService, StockStore};
use tw_screener::sources::YahooFinanceClient;
use tw_screener::types::default_stock_list;
use tw_screener::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tw_screener=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting tw-screener on {}:{}", config.host, config.port);

    let source = Arc::new(YahooFinanceClient::new(&config.yahoo_symbol_suffix)?);
    let store = StockStore::new();
    let refresh = RefreshService::new(source, store.clone(), config.refresh.clone());
    let stocks = Arc::new(default_stock_list());
    info!("Screening universe of {} stocks", stocks.len());

    if let Some(interval) = config.refresh.interval() {
        info!("Periodic refresh every {:?}", interval);
        refresh
            .clone()
            .spawn_periodic(interval, stocks.as_ref().clone());
    }

    if let Some(keep_alive) = config.keep_alive.clone() {
        spawn_keep_alive(keep_alive);
    }

    let state = AppState {
        config: config.clone(),
        store,
        refresh,
        stocks,
    };

    let app = api::app(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("tw-screener listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
