//! Yahoo Finance API client for daily stock history.
//!
//! Uses the unofficial chart API. Taiwan listed codes are suffixed with the
//! exchange (`2330` -> `2330.TW`).

use crate::sources::{PriceSource, SourceError};
use crate::types::PricePoint;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    /// Exchange offset from UTC in seconds (28800 for Taipei).
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<i64>>>,
}

/// Chart range wide enough to cover `days` trading days.
fn range_for_days(days: u32) -> &'static str {
    match days {
        0..=5 => "5d",
        6..=20 => "1mo",
        21..=60 => "3mo",
        61..=120 => "6mo",
        121..=250 => "1y",
        _ => "2y",
    }
}

/// Trading date of a bar in the exchange's local time.
fn trading_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// Convert a chart response into validated bars, oldest first.
///
/// Rows with missing or non-positive prices are skipped. When two rows fall
/// on the same trading date the later one wins.
fn parse_chart(symbol: &str, data: YahooChartResponse) -> Result<Vec<PricePoint>, SourceError> {
    if let Some(error) = data.chart.error {
        return Err(SourceError::Api(format!(
            "{} - {}",
            error.code, error.description
        )));
    }

    let result = data
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| SourceError::NoData(symbol.to_string()))?;

    let timestamps = result
        .timestamp
        .ok_or_else(|| SourceError::NoData(symbol.to_string()))?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::NoData(symbol.to_string()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let Some(date) = trading_date(timestamp, result.meta.gmtoffset) else {
            continue;
        };
        let (Some(open), Some(high), Some(low), Some(close)) = (
            column(&opens, i),
            column(&highs, i),
            column(&lows, i),
            column(&closes, i),
        ) else {
            continue;
        };
        let volume = volumes.get(i).copied().flatten().unwrap_or(0);

        let point = match PricePoint::new(date, open, high, low, close, volume) {
            Ok(point) => point,
            Err(e) => {
                debug!("Skipping {} bar: {}", symbol, e);
                continue;
            }
        };

        if let Some(last) = points.last_mut() {
            if last.date == point.date {
                *last = point;
                continue;
            }
            if last.date > point.date {
                continue;
            }
        }
        points.push(point);
    }

    Ok(points)
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    symbol_suffix: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client appending `symbol_suffix` to codes.
    pub fn new(symbol_suffix: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            symbol_suffix: symbol_suffix.to_string(),
        })
    }

    /// Yahoo symbol for a listed code.
    pub fn symbol(&self, code: &str) -> String {
        format!("{}{}", code.trim().to_uppercase(), self.symbol_suffix)
    }

    /// Fetch daily chart data for a symbol.
    ///
    /// Arguments:
    /// - range: Time range ("1d", "5d", "1mo", "3mo", "6mo", "1y", "2y")
    async fn get_daily_chart(&self, code: &str, range: &str) -> Result<Vec<PricePoint>, SourceError> {
        let symbol = self.symbol(code);
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range={}&interval=1d&includePrePost=false",
            symbol, range
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "{} returned {}",
                symbol,
                response.status()
            )));
        }

        let data: YahooChartResponse = response.json().await?;
        parse_chart(&symbol, data)
    }
}

#[axum::async_trait]
impl PriceSource for YahooFinanceClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn daily_history(&self, code: &str, days: u32) -> Result<Vec<PricePoint>, SourceError> {
        let mut points = self.get_daily_chart(code, range_for_days(days)).await?;
        let excess = points.len().saturating_sub(days as usize);
        points.drain(..excess);
        Ok(points)
    }

    async fn current_bar(&self, code: &str) -> Result<Option<PricePoint>, SourceError> {
        Ok(self.get_daily_chart(code, "1d").await?.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<PricePoint>, SourceError> {
        let data: YahooChartResponse = serde_json::from_str(json).unwrap();
        parse_chart("2330.TW", data)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn test_range_for_days() {
        assert_eq!(range_for_days(5), "5d");
        assert_eq!(range_for_days(20), "1mo");
        assert_eq!(range_for_days(60), "3mo");
        assert_eq!(range_for_days(90), "6mo");
        assert_eq!(range_for_days(200), "1y");
        assert_eq!(range_for_days(500), "2y");
    }

    #[test]
    fn test_trading_date_uses_exchange_offset() {
        // 2024-03-04 01:00 UTC is 09:00 in Taipei
        let ts = 1709514000;
        assert_eq!(
            trading_date(ts, 28800),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
        // 2024-03-03 20:00 UTC is already the 4th in Taipei
        assert_eq!(
            trading_date(ts - 5 * 3600, 28800),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
    }

    #[test]
    fn test_symbol_suffix() {
        let client = YahooFinanceClient::new(".TW").unwrap();
        assert_eq!(client.symbol("2330"), "2330.TW");
        assert_eq!(client.symbol(" 00878 "), "00878.TW");
    }

    // =========================================================================
    // Chart parsing
    // =========================================================================

    #[test]
    fn test_parse_chart() {
        let points = parse(
            r#"{"chart": {"result": [{
                "meta": {"gmtoffset": 28800},
                "timestamp": [1709514000, 1709600400],
                "indicators": {"quote": [{
                    "open": [700.0, 705.0],
                    "high": [710.0, 712.0],
                    "low": [698.0, 701.0],
                    "close": [705.0, 709.0],
                    "volume": [25000000, 27000000]
                }]}
            }], "error": null}}"#,
        )
        .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(points[1].close, 709.0);
        assert_eq!(points[1].volume, 27_000_000);
    }

    #[test]
    fn test_parse_chart_skips_null_rows() {
        let points = parse(
            r#"{"chart": {"result": [{
                "meta": {"gmtoffset": 28800},
                "timestamp": [1709514000, 1709600400, 1709686800],
                "indicators": {"quote": [{
                    "open": [700.0, null, 706.0],
                    "high": [710.0, null, 711.0],
                    "low": [698.0, null, 703.0],
                    "close": [705.0, null, 708.0],
                    "volume": [25000000, null, null]
                }]}
            }], "error": null}}"#,
        )
        .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[1].volume, 0);
    }

    #[test]
    fn test_parse_chart_same_day_latest_wins() {
        let points = parse(
            r#"{"chart": {"result": [{
                "meta": {"gmtoffset": 28800},
                "timestamp": [1709514000, 1709530000],
                "indicators": {"quote": [{
                    "open": [700.0, 700.0],
                    "high": [710.0, 715.0],
                    "low": [698.0, 698.0],
                    "close": [705.0, 713.0],
                    "volume": [1000, 2000]
                }]}
            }], "error": null}}"#,
        )
        .unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 713.0);
    }

    #[test]
    fn test_parse_chart_skips_zero_close() {
        let points = parse(
            r#"{"chart": {"result": [{
                "timestamp": [1709514000],
                "indicators": {"quote": [{
                    "open": [1.0], "high": [1.0], "low": [1.0], "close": [0.0]
                }]}
            }], "error": null}}"#,
        )
        .unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_parse_chart_api_error() {
        let err = parse(
            r#"{"chart": {"result": null, "error": {
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::Api(msg) if msg.starts_with("Not Found")));
    }

    #[test]
    fn test_parse_chart_without_timestamps() {
        let err = parse(
            r#"{"chart": {"result": [{
                "meta": {},
                "indicators": {"quote": [{}]}
            }], "error": null}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::NoData(_)));
    }
}
