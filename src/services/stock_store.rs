//! In-memory store of the latest screening results.

use crate::types::{StockAnalysis, TaskStatus};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Bookkeeping for the most recent refresh job.
#[derive(Debug, Default)]
struct JobState {
    id: Option<Uuid>,
    last_update: Option<DateTime<Utc>>,
    failed: usize,
}

/// Latest analysis per stock code plus refresh job state.
pub struct StockStore {
    analyses: DashMap<String, StockAnalysis>,
    is_updating: AtomicBool,
    job: RwLock<JobState>,
}

impl StockStore {
    /// Create a new empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mark a refresh as running. Returns the new job id, or `None` if one is
    /// already in progress.
    pub async fn try_begin_update(&self) -> Option<Uuid> {
        if self
            .is_updating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }

        let id = Uuid::new_v4();
        self.job.write().await.id = Some(id);
        Some(id)
    }

    /// Publish the results of a refresh and clear the running flag.
    ///
    /// Stocks missing from `analyses` are dropped; readers never observe an
    /// empty store in between.
    pub async fn finish_update(&self, analyses: Vec<StockAnalysis>, failed: usize) {
        let codes: HashSet<String> = analyses.iter().map(|a| a.code.clone()).collect();
        self.analyses.retain(|code, _| codes.contains(code));
        for analysis in analyses {
            self.analyses.insert(analysis.code.clone(), analysis);
        }

        {
            let mut job = self.job.write().await;
            job.last_update = Some(Utc::now());
            job.failed = failed;
        }
        self.is_updating.store(false, Ordering::SeqCst);
    }

    /// Insert or replace a single analysis.
    pub fn upsert(&self, analysis: StockAnalysis) {
        self.analyses.insert(analysis.code.clone(), analysis);
    }

    pub fn get(&self, code: &str) -> Option<StockAnalysis> {
        self.analyses.get(code).map(|a| a.clone())
    }

    /// All analyses, highest score first.
    pub fn all(&self) -> Vec<StockAnalysis> {
        let mut all: Vec<StockAnalysis> = self.analyses.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.code.cmp(&b.code)));
        all
    }

    /// Analyses scoring at least `min_score`, highest first, at most `limit`.
    pub fn screen(&self, min_score: u8, limit: Option<usize>) -> Vec<StockAnalysis> {
        self.all()
            .into_iter()
            .filter(|a| a.score >= min_score)
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    pub fn is_updating(&self) -> bool {
        self.is_updating.load(Ordering::SeqCst)
    }

    pub async fn status(&self) -> TaskStatus {
        let job = self.job.read().await;
        TaskStatus {
            is_updating: self.is_updating(),
            last_update_time: job.last_update.map(|t| t.to_rfc3339()),
            stocks_count: self.len(),
            job_id: job.id,
            failed: job.failed,
        }
    }
}

impl Default for StockStore {
    fn default() -> Self {
        Self {
            analyses: DashMap::new(),
            is_updating: AtomicBool::new(false),
            job: RwLock::new(JobState::default()),
        }
    }
}
