//! Bull/bear line.

use crate::services::signals::ema::Ema;
use crate::services::signals::window::{relative_position, window_max, window_min};
use crate::services::signals::{clamp_line, Line};
use crate::types::PricePoint;

/// Bull/bear line.
///
/// Typical price `(2C + H + L + O) / 5` normalized against the 34-day
/// low/high range, then smoothed with a 13-period EMA.
pub struct BullBearLine {
    window: usize,
    period: usize,
}

impl Default for BullBearLine {
    fn default() -> Self {
        Self {
            window: 34,
            period: 13,
        }
    }
}

impl BullBearLine {
    /// Normalized typical price per bar (0-100, 50 when the range is flat).
    pub fn normalized(&self, candles: &[PricePoint]) -> Vec<f64> {
        let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();

        candles
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let lowest = window_min(&lows, i, self.window);
                let highest = window_max(&highs, i, self.window);
                clamp_line(relative_position(c.typical_price(), lowest, highest))
            })
            .collect()
    }
}

impl Line for BullBearLine {
    fn id(&self) -> &str {
        "bull_bear_line"
    }

    fn name(&self) -> &str {
        "Bull/Bear Line"
    }

    fn series(&self, candles: &[PricePoint]) -> Vec<f64> {
        Ema::new(self.period).series(&self.normalized(candles))
    }
}
