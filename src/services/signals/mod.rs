//! Fund-flow / bull-bear indicator engine.
//!
//! A pure function from one instrument's daily bars to an
//! [`IndicatorSnapshot`]: the fund-flow trend and bull/bear line are built
//! independently over the whole series, then the last two or three days are
//! checked for an upward crossover inside the oversold zone.

pub mod bull_bear;
pub mod classifier;
pub mod detector;
pub mod ema;
pub mod fund_flow;
pub mod smoother;
pub mod window;

pub use bull_bear::BullBearLine;
pub use classifier::{classify, classify_outcome};
pub use fund_flow::FundFlowTrend;
pub use smoother::{SmootherState, WeightedSmoother};

use crate::types::{IndicatorSnapshot, PricePoint};
use thiserror::Error;

/// Minimum number of daily bars needed to compute a snapshot.
pub const MIN_DATA_POINTS: usize = 34;

/// The series was shorter than [`MIN_DATA_POINTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient data: got {actual} bars, need at least {required}")]
pub struct InsufficientDataError {
    pub actual: usize,
    pub required: usize,
}

/// An oscillator line producing one 0-100 value per bar.
pub trait Line: Send + Sync {
    /// Unique identifier for this line.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Calculate the line over all bars, oldest first.
    fn series(&self, candles: &[PricePoint]) -> Vec<f64>;
}

/// Compute the indicator snapshot for the last day of `candles`.
///
/// `candles` must be sorted ascending by date without duplicates.
pub fn compute_indicators(
    candles: &[PricePoint],
) -> Result<IndicatorSnapshot, InsufficientDataError> {
    let insufficient = InsufficientDataError {
        actual: candles.len(),
        required: MIN_DATA_POINTS,
    };

    if candles.len() < MIN_DATA_POINTS {
        return Err(insufficient);
    }

    let fund_flow = FundFlowTrend::default().series(candles);
    let bull_bear = BullBearLine::default().series(candles);

    // Only the day before the first full bull/bear window onwards is evaluated
    let start = MIN_DATA_POINTS - 2;
    detector::detect(&fund_flow[start..], &bull_bear[start..]).ok_or(insufficient)
}

/// Clamp a line value into the 0-100 band.
pub fn clamp_line(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
