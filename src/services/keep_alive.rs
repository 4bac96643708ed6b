//! Self-ping that keeps idle-suspending hosts awake.

use crate::config::KeepAliveConfig;
use reqwest::Client;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const PING_TIMEOUT_SECS: u64 = 10;

/// Health endpoint pinged under the configured base URL.
pub fn health_url(base: &str) -> String {
    format!("{}/health", base.trim_end_matches('/'))
}

/// Ping `{url}/health` every `interval_secs`. The first ping happens after one
/// full interval.
pub fn spawn_keep_alive(config: KeepAliveConfig) -> JoinHandle<()> {
    let url = health_url(&config.url);
    let interval = Duration::from_secs(config.interval_secs.max(1));

    tokio::spawn(async move {
        let client = match Client::builder()
            .timeout(Duration::from_secs(PING_TIMEOUT_SECS))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!("Keep-alive disabled: {}", e);
                return;
            }
        };

        info!("Keep-alive pinging {} every {:?}", url, interval);
        loop {
            tokio::time::sleep(interval).await;
            match client.get(&url).send().await {
                Ok(response) if response.status().is_success() => info!("Keep-alive ping sent"),
                Ok(response) => warn!("Keep-alive ping returned {}", response.status()),
                Err(e) => warn!("Keep-alive ping failed: {}", e),
            }
        }
    })
}
