//! Fetch-and-analyse jobs over the stock universe.

use crate::config::RefreshConfig;
use crate::services::signals::{classify_outcome, compute_indicators, InsufficientDataError};
use crate::services::StockStore;
use crate::sources::{PriceSource, SourceError};
use crate::types::{
    FundTrend, IndicatorSnapshot, LineTrend, Series, StockAnalysis, StockInfo,
};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Outcome of one refresh over a stock list.
#[derive(Debug, Clone, Default)]
pub struct RefreshSummary {
    pub analysed: usize,
    pub failed: usize,
}

/// Build the screening record for a stock from its series and engine result.
pub fn build_analysis(
    stock: &StockInfo,
    series: &Series,
    outcome: Result<IndicatorSnapshot, InsufficientDataError>,
) -> StockAnalysis {
    let status = classify_outcome(&outcome);
    let snapshot = outcome.ok();
    let last = series.last();

    StockAnalysis {
        code: stock.code.clone(),
        name: stock.name.clone(),
        close_price: last.map(|p| p.close).unwrap_or(0.0),
        change_percent: series.change_percent(),
        volume: last.map(|p| p.volume).unwrap_or(0),
        status,
        label: status.label().to_string(),
        score: status.score(),
        fund_trend: snapshot
            .map(|s| FundTrend::from_values(s.fund_flow_trend, s.fund_flow_trend_prev)),
        line_trend: snapshot
            .map(|s| LineTrend::from_values(s.bull_bear_line, s.bull_bear_line_prev)),
        snapshot,
        data_points: series.len(),
        updated_at: chrono::Utc::now().timestamp_millis(),
    }
}

/// Runs analyses against a price source and publishes them to the store.
pub struct RefreshService {
    source: Arc<dyn PriceSource>,
    store: Arc<StockStore>,
    config: RefreshConfig,
}

impl RefreshService {
    pub fn new(
        source: Arc<dyn PriceSource>,
        store: Arc<StockStore>,
        config: RefreshConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            source,
            store,
            config,
        })
    }

    pub fn store(&self) -> &Arc<StockStore> {
        &self.store
    }

    /// Fetch history for one stock and compute its analysis.
    ///
    /// A series too short for the engine still yields an analysis with the
    /// insufficient-data status.
    pub async fn analyze(&self, stock: &StockInfo) -> Result<StockAnalysis, SourceError> {
        let history = self
            .source
            .daily_history(&stock.code, self.config.history_days)
            .await?;

        let mut series = Series::new(history)?;
        match self.source.current_bar(&stock.code).await {
            Ok(Some(bar)) => series = series.with_current_bar(bar),
            Ok(None) => {}
            Err(e) => warn!("Current bar for {} unavailable: {}", stock.code, e),
        }

        if series.is_empty() {
            return Err(SourceError::NoData(stock.code.clone()));
        }

        let outcome = compute_indicators(series.as_slice());
        if let Err(e) = &outcome {
            debug!("{}: {}", stock.code, e);
        }

        Ok(build_analysis(stock, &series, outcome))
    }

    /// Analyse one stock, bounded by the per-instrument timeout.
    pub async fn analyze_with_timeout(
        &self,
        stock: &StockInfo,
    ) -> Result<StockAnalysis, crate::error::AppError> {
        match tokio::time::timeout(self.config.timeout(), self.analyze(stock)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(crate::error::AppError::Timeout(stock.code.clone())),
        }
    }

    /// Analyse stocks on a bounded worker pool. Failures and timeouts are
    /// logged and counted, never propagated.
    pub async fn analyze_many(&self, stocks: &[StockInfo]) -> (Vec<StockAnalysis>, usize) {
        let results: Vec<_> = stream::iter(stocks.iter().cloned())
            .map(|stock| async move {
                let result = self.analyze_with_timeout(&stock).await;
                (stock, result)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut analyses = Vec::with_capacity(results.len());
        let mut failed = 0;
        for (stock, result) in results {
            match result {
                Ok(analysis) => analyses.push(analysis),
                Err(e) => {
                    warn!("Failed to analyse {} ({}): {}", stock.code, stock.name, e);
                    failed += 1;
                }
            }
        }

        (analyses, failed)
    }

    /// Refresh every stock in `stocks` and publish the results.
    ///
    /// The caller must have claimed the store's update flag.
    pub async fn refresh_all(&self, stocks: &[StockInfo]) -> RefreshSummary {
        info!(
            "Refreshing {} stocks from {}",
            stocks.len(),
            self.source.name()
        );

        let (analyses, failed) = self.analyze_many(stocks).await;
        let summary = RefreshSummary {
            analysed: analyses.len(),
            failed,
        };
        self.store.finish_update(analyses, failed).await;

        info!(
            "Refresh complete: {} analysed, {} failed",
            summary.analysed, summary.failed
        );
        summary
    }

    /// Start a refresh on a background task.
    ///
    /// Returns `None` when a refresh is already running.
    pub async fn trigger_refresh(self: &Arc<Self>, stocks: Vec<StockInfo>) -> Option<Uuid> {
        let job_id = self.store.try_begin_update().await?;
        let service = self.clone();
        tokio::spawn(async move {
            service.refresh_all(&stocks).await;
        });
        info!("Started refresh job {}", job_id);
        Some(job_id)
    }

    /// Analyse the first `count` stocks synchronously when nothing has been
    /// refreshed yet and no refresh is running.
    pub async fn ensure_seeded(&self, stocks: &[StockInfo], count: usize) {
        if !self.store.is_empty() || self.store.is_updating() {
            return;
        }

        let seed = &stocks[..count.min(stocks.len())];
        let (analyses, failed) = self.analyze_many(seed).await;
        if failed > 0 {
            warn!("{} of {} seed stocks failed", failed, seed.len());
        }
        for analysis in analyses {
            self.store.upsert(analysis);
        }
    }

    /// Re-run the refresh on a fixed interval.
    pub fn spawn_periodic(
        self: Arc<Self>,
        interval: Duration,
        stocks: Vec<StockInfo>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match self.trigger_refresh(stocks.clone()).await {
                    Some(job_id) => debug!("Scheduled refresh job {}", job_id),
                    None => error!("Skipping scheduled refresh: previous refresh still running"),
                }
            }
        })
    }
}
