use serde::{Deserialize, Serialize};

/// Indicator values for the last two days of a series plus the entry-signal state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    /// Fund-flow trend on the current day (0-100).
    pub fund_flow_trend: f64,
    /// Bull/bear line on the current day (0-100).
    pub bull_bear_line: f64,
    /// Fund-flow trend on the previous day.
    pub fund_flow_trend_prev: f64,
    /// Bull/bear line on the previous day.
    pub bull_bear_line_prev: f64,
    /// Crossover sub-condition of the day that decided the signal.
    pub is_crossover: bool,
    /// Oversold sub-condition of the day that decided the signal.
    pub is_oversold: bool,
    /// Crossover while oversold on the current or previous day.
    pub entry_signal: bool,
}

/// Discrete status of an instrument, ordered by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    EntrySignal,
    CrossedNotOversold,
    OversoldNoCross,
    FundFlowDominant,
    FundFlowWeak,
    InsufficientData,
}

impl EntryStatus {
    pub fn score(&self) -> u8 {
        match self {
            EntryStatus::EntrySignal => 100,
            EntryStatus::CrossedNotOversold => 75,
            EntryStatus::OversoldNoCross => 65,
            EntryStatus::FundFlowDominant => 55,
            EntryStatus::FundFlowWeak => 30,
            EntryStatus::InsufficientData => 0,
        }
    }

    /// Get display label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::EntrySignal => "Entry signal",
            EntryStatus::CrossedNotOversold => "Crossed, not oversold",
            EntryStatus::OversoldNoCross => "Oversold, no cross",
            EntryStatus::FundFlowDominant => "Fund flow dominant",
            EntryStatus::FundFlowWeak => "Fund flow weak",
            EntryStatus::InsufficientData => "Insufficient data",
        }
    }
}

/// Day-over-day direction of the fund-flow trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundTrend {
    Inflow,
    Outflow,
    Flat,
}

impl FundTrend {
    pub fn from_values(current: f64, previous: f64) -> Self {
        if current > previous {
            FundTrend::Inflow
        } else if current < previous {
            FundTrend::Outflow
        } else {
            FundTrend::Flat
        }
    }
}

/// Day-over-day direction of the bull/bear line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineTrend {
    Bullish,
    Bearish,
    Ranging,
}

impl LineTrend {
    pub fn from_values(current: f64, previous: f64) -> Self {
        if current > previous {
            LineTrend::Bullish
        } else if current < previous {
            LineTrend::Bearish
        } else {
            LineTrend::Ranging
        }
    }
}

/// Screening result for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub code: String,
    pub name: String,
    pub close_price: f64,
    /// Change of the last close against the previous close, in percent.
    pub change_percent: f64,
    pub volume: u64,
    /// Absent when the series was too short.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<IndicatorSnapshot>,
    pub status: EntryStatus,
    pub label: String,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_trend: Option<FundTrend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_trend: Option<LineTrend>,
    /// Number of daily bars the analysis was computed from.
    pub data_points: usize,
    /// Unix timestamp (milliseconds) when computed.
    pub updated_at: i64,
}
