//! Fund-flow trend line.

use crate::services::signals::window::{relative_position, trailing, window_max, window_min};
use crate::services::signals::{clamp_line, Line, WeightedSmoother};
use crate::types::PricePoint;

/// Fund-flow trend.
///
/// Close position inside the 27-day low/high range, smoothed by a cascade of
/// two weighted recursive smoothers and linearly rescaled:
///
/// ```text
/// R    = (close - lowest low) / (highest high - lowest low) * 100   (50 when flat)
/// WSA1 = smoother(5, 1) over the trailing 5 R values
/// WSA2 = smoother(3, 1) over the trailing 3 WSA1 values
/// FF   = clamp((3 * WSA1 - 2 * WSA2 - 50) * 1.032 + 50, 0, 100)
/// ```
///
/// Each day re-runs both smoothers over its own trailing sub-window, so the
/// second stage sees per-day WSA1 values rather than one continuous stream.
pub struct FundFlowTrend {
    window: usize,
    fast: WeightedSmoother,
    slow: WeightedSmoother,
    gain: f64,
}

impl Default for FundFlowTrend {
    fn default() -> Self {
        Self {
            window: 27,
            fast: WeightedSmoother::new(5, 1),
            slow: WeightedSmoother::new(3, 1),
            gain: 1.032,
        }
    }
}

impl FundFlowTrend {
    /// Close position inside the look-back range, per bar.
    pub fn relative_positions(&self, candles: &[PricePoint]) -> Vec<f64> {
        let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();

        candles
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let lowest = window_min(&lows, i, self.window);
                let highest = window_max(&highs, i, self.window);
                relative_position(c.close, lowest, highest)
            })
            .collect()
    }

    /// Last smoother output over the trailing sub-window ending at each index.
    fn smooth_trailing(smoother: &WeightedSmoother, values: &[f64]) -> Vec<f64> {
        (0..values.len())
            .map(|i| smoother.last(trailing(values, i, smoother.length())))
            .collect()
    }
}

impl Line for FundFlowTrend {
    fn id(&self) -> &str {
        "fund_flow_trend"
    }

    fn name(&self) -> &str {
        "Fund Flow Trend"
    }

    fn series(&self, candles: &[PricePoint]) -> Vec<f64> {
        let relative = self.relative_positions(candles);
        let wsa1 = Self::smooth_trailing(&self.fast, &relative);
        let wsa2 = Self::smooth_trailing(&self.slow, &wsa1);

        wsa1.iter()
            .zip(&wsa2)
            .map(|(a, b)| clamp_line((3.0 * a - 2.0 * b - 50.0) * self.gain + 50.0))
            .collect()
    }
}
