//! Exponential Moving Average (EMA).

/// EMA with a simple-average warm-up.
///
/// The first `period` values are the running simple average of everything
/// seen so far; from index `period` on the usual recursion applies, seeded
/// with the simple average at index `period - 1`.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    /// Smoothing factor `2 / (period + 1)`.
    pub fn multiplier(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// One EMA value per input value.
    pub fn series(&self, values: &[f64]) -> Vec<f64> {
        let multiplier = self.multiplier();
        let mut out = Vec::with_capacity(values.len());
        let mut sum = 0.0;

        for (i, &value) in values.iter().enumerate() {
            let next = if i < self.period {
                sum += value;
                sum / (i + 1) as f64
            } else {
                let ema = out[i - 1];
                (value - ema) * multiplier + ema
            };
            out.push(next);
        }

        out
    }
}
