use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building price bars or series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("{field} must be a positive finite price, got {value} on {date}")]
    InvalidPrice {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },

    #[error("volume must not be negative, got {volume} on {date}")]
    NegativeVolume { date: NaiveDate, volume: i64 },

    #[error("bars must be strictly increasing by date: {previous} is followed by {next}")]
    OutOfOrder { previous: NaiveDate, next: NaiveDate },
}

/// One daily OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    /// Build a bar, rejecting non-positive prices and negative volume.
    ///
    /// Volume is accepted as a signed value so that feeds reporting negative
    /// numbers are rejected here instead of wrapping.
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Result<Self, PriceError> {
        for (field, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PriceError::InvalidPrice { date, field, value });
            }
        }

        let volume = u64::try_from(volume).map_err(|_| PriceError::NegativeVolume { date, volume })?;

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Typical price weighting the close twice: `(2C + H + L + O) / 5`.
    pub fn typical_price(&self) -> f64 {
        (2.0 * self.close + self.high + self.low + self.open) / 5.0
    }
}

/// Daily bars of one instrument, strictly increasing by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    points: Vec<PricePoint>,
}

impl Series {
    /// Wrap bars that are already sorted; duplicates and reversals are rejected.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, PriceError> {
        if let Some(pair) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(PriceError::OutOfOrder {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
        Ok(Self { points })
    }

    /// Append today's bar unless a bar with the same date is already present.
    ///
    /// A bar older than the last one is ignored as well, keeping the series sorted.
    pub fn with_current_bar(mut self, bar: PricePoint) -> Self {
        match self.points.last() {
            Some(last) if last.date >= bar.date => {}
            _ => self.points.push(bar),
        }
        self
    }

    pub fn as_slice(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Percentage change between the last two closes, 0 when there is only one bar.
    pub fn change_percent(&self) -> f64 {
        match self.points.as_slice() {
            [.., prev, last] => (last.close - prev.close) / prev.close * 100.0,
            _ => 0.0,
        }
    }
}
