//! Crossover-in-oversold signal detection.
//!
//! A day signals when the fund-flow trend crosses above the bull/bear line
//! while the bull/bear line is below [`OVERSOLD_LEVEL`]. The entry signal
//! looks at the current day and, when there is enough history, the day
//! before it, so a signal queried one day late is not lost.

use crate::types::IndicatorSnapshot;

/// Bull/bear line level below which the market is considered oversold.
pub const OVERSOLD_LEVEL: f64 = 25.0;

/// Sub-conditions evaluated for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayConditions {
    pub crossover: bool,
    pub oversold: bool,
}

impl DayConditions {
    /// Evaluate day `day` (must be >= 1).
    ///
    /// Equality on the prior day counts as "not yet crossed"; equality on the
    /// day itself does not count as crossed.
    pub fn evaluate(fund_flow: &[f64], bull_bear: &[f64], day: usize) -> Self {
        let crossover =
            fund_flow[day] > bull_bear[day] && fund_flow[day - 1] <= bull_bear[day - 1];
        let oversold = bull_bear[day] < OVERSOLD_LEVEL;
        Self {
            crossover,
            oversold,
        }
    }

    pub fn signal(&self) -> bool {
        self.crossover && self.oversold
    }
}

/// Build the snapshot for the last day of the evaluated lines.
///
/// Needs at least two points; the previous-day branch is only evaluated with
/// three or more. Returns `None` when fewer than two points are given.
pub fn detect(fund_flow: &[f64], bull_bear: &[f64]) -> Option<IndicatorSnapshot> {
    let len = fund_flow.len().min(bull_bear.len());
    if len < 2 {
        return None;
    }
    let (fund_flow, bull_bear) = (&fund_flow[..len], &bull_bear[..len]);

    let current = len - 1;
    let today = DayConditions::evaluate(fund_flow, bull_bear, current);
    let yesterday = (len >= 3).then(|| DayConditions::evaluate(fund_flow, bull_bear, current - 1));

    let reported = match yesterday {
        Some(prev) if !today.signal() && prev.signal() => prev,
        _ => today,
    };

    Some(IndicatorSnapshot {
        fund_flow_trend: fund_flow[current],
        bull_bear_line: bull_bear[current],
        fund_flow_trend_prev: fund_flow[current - 1],
        bull_bear_line_prev: bull_bear[current - 1],
        is_crossover: reported.crossover,
        is_oversold: reported.oversold,
        entry_signal: today.signal() || yesterday.is_some_and(|d| d.signal()),
    })
}
