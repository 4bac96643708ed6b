//! Map a snapshot to a discrete status and score.

use crate::services::signals::InsufficientDataError;
use crate::types::{EntryStatus, IndicatorSnapshot};

/// Ordered rule evaluation, first match wins.
pub fn classify(snapshot: &IndicatorSnapshot) -> EntryStatus {
    if snapshot.entry_signal {
        EntryStatus::EntrySignal
    } else if snapshot.is_crossover && !snapshot.is_oversold {
        EntryStatus::CrossedNotOversold
    } else if snapshot.is_oversold && !snapshot.is_crossover {
        EntryStatus::OversoldNoCross
    } else if snapshot.fund_flow_trend > snapshot.bull_bear_line {
        EntryStatus::FundFlowDominant
    } else {
        EntryStatus::FundFlowWeak
    }
}

/// Classify an engine result; a short series maps to [`EntryStatus::InsufficientData`].
pub fn classify_outcome(outcome: &Result<IndicatorSnapshot, InsufficientDataError>) -> EntryStatus {
    match outcome {
        Ok(snapshot) => classify(snapshot),
        Err(_) => EntryStatus::InsufficientData,
    }
}
