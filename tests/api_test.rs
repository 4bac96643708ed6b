//! Integration tests for API endpoints against an in-memory price source

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use tw_screener::config::{Config, RefreshConfig};
use tw_screener::services::{RefreshService, StockStore};
use tw_screener::sources::{PriceSource, SourceError};
use tw_screener::types::{PricePoint, StockInfo};
use tw_screener::{api, AppState};

struct FixedSource {
    bars: HashMap<String, Vec<PricePoint>>,
}

#[axum::async_trait]
impl PriceSource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn daily_history(&self, code: &str, _days: u32) -> Result<Vec<PricePoint>, SourceError> {
        self.bars
            .get(code)
            .cloned()
            .ok_or_else(|| SourceError::NoData(code.to_string()))
    }
}

fn bars(rows: &[(f64, f64, f64, f64)]) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    rows.iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| {
            PricePoint::new(start + chrono::Duration::days(i as i64), o, h, l, c, 1000).unwrap()
        })
        .collect()
}

/// Steady decline followed by a sharp one-day rally: crosses up while oversold.
fn entry_bars() -> Vec<PricePoint> {
    let mut rows = Vec::new();
    let mut prev = 150.0;
    for _ in 0..39 {
        let c = prev - 1.0;
        rows.push((prev, prev, c, c));
        prev = c;
    }
    rows.push((prev, 150.0, prev, 150.0));
    bars(&rows)
}

fn flat_bars(count: usize) -> Vec<PricePoint> {
    bars(&vec![(100.0, 100.0, 100.0, 100.0); count])
}

fn test_app() -> (Router, AppState) {
    let mut data = HashMap::new();
    data.insert("2330".to_string(), entry_bars());
    data.insert("2317".to_string(), flat_bars(60));
    data.insert("2454".to_string(), flat_bars(10));

    let config = Arc::new(Config {
        refresh: RefreshConfig {
            timeout_secs: 5,
            ..RefreshConfig::default()
        },
        ..Config::default()
    });
    let store = StockStore::new();
    let refresh = RefreshService::new(
        Arc::new(FixedSource { bars: data }),
        store.clone(),
        config.refresh.clone(),
    );
    let state = AppState {
        config,
        store,
        refresh,
        stocks: Arc::new(vec![
            StockInfo::new("2330", "台積電"),
            StockInfo::new("2317", "鴻海"),
            StockInfo::new("2454", "聯發科"),
            StockInfo::new("9999", "不存在"),
        ]),
    };
    (api::app(state.clone()), state)
}

async fn send(app: Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Body::empty()).await
}

async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Body::from(body.to_string())).await
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_version_endpoint() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/api/nope/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Not Found");
}

#[tokio::test]
async fn test_security_headers_present() {
    let (app, _) = test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
}

// =============================================================================
// Stocks
// =============================================================================

#[tokio::test]
async fn test_list_stocks() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/api/stocks/list").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 4);
    assert_eq!(json["data"][0]["stock_id"], "2330");
}

#[tokio::test]
async fn test_stock_detail_entry_signal() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/api/stocks/2330").await;
    assert_eq!(status, StatusCode::OK);

    let data = &json["data"];
    assert_eq!(data["name"], "台積電");
    assert_eq!(data["status"], "entry_signal");
    assert_eq!(data["score"], 100);
    assert_eq!(data["snapshot"]["entrySignal"], true);
    assert_eq!(data["closePrice"], 150.0);
}

#[tokio::test]
async fn test_stock_detail_insufficient_data() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/api/stocks/2454").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "insufficient_data");
    assert_eq!(json["data"]["score"], 0);
    assert!(json["data"].get("snapshot").is_none());
}

#[tokio::test]
async fn test_stock_detail_unknown_code() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/api/stocks/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_stock_detail_invalid_code() {
    let (app, _) = test_app();
    let (status, _) = get(app, "/api/stocks/23%2D30").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_screen_seeds_empty_store() {
    let (app, state) = test_app();
    let (status, json) = post(app, "/api/stocks/screen", "").await;
    assert_eq!(status, StatusCode::OK);

    // Seeding analysed the three stocks with data; only the entry passes 70
    assert_eq!(state.store.len(), 3);
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["code"], "2330");
}

#[tokio::test]
async fn test_screen_with_lower_threshold() {
    let (app, _) = test_app();
    let (status, json) = post(app, "/api/stocks/screen", r#"{"minScore": 30}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][0]["score"], 100);
    assert_eq!(json["data"][1]["score"], 30);
}

#[tokio::test]
async fn test_screen_limit() {
    let (app, _) = test_app();
    let (_, json) = post(app, "/api/stocks/screen", r#"{"minScore": 0, "limit": 2}"#).await;
    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn test_screen_rejects_bad_body() {
    let (app, _) = test_app();
    let (status, json) = post(app.clone(), "/api/stocks/screen", "{minScore").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (status, _) = post(app, "/api/stocks/screen", r#"{"minScore": 101}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_then_status() {
    let (app, state) = test_app();
    let (status, json) = post(app.clone(), "/api/stocks/update", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(json["jobId"].is_string());

    // Wait for the background job
    for _ in 0..100 {
        if !state.store.is_updating() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let (status, json) = get(app, "/api/task/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isUpdating"], false);
    assert_eq!(json["stocksCount"], 3);
    assert_eq!(json["failed"], 1);
    assert!(json["lastUpdateTime"].is_string());
}

#[tokio::test]
async fn test_update_rejected_while_running() {
    let (app, state) = test_app();
    state.store.try_begin_update().await.unwrap();

    let (status, json) = post(app, "/api/stocks/update", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert!(json.get("jobId").is_none());
}
