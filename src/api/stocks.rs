//! Stock universe, refresh and screening endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::types::{StockAnalysis, StockInfo};
use crate::AppState;

/// List response wrapper.
#[derive(Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ListResponse<T> {
    fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub data: StockAnalysis,
}

/// Optional body of the screen endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenRequest {
    pub min_score: Option<u8>,
    pub limit: Option<usize>,
}

impl ScreenRequest {
    /// Parse a possibly empty JSON body.
    fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(body)?)
    }
}

/// Create the stocks router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_stocks))
        .route("/update", post(update_stocks))
        .route("/screen", post(screen_stocks))
        .route("/:code", get(get_stock))
}

/// The screening universe.
async fn list_stocks(State(state): State<AppState>) -> Json<ListResponse<StockInfo>> {
    Json(ListResponse::new(state.stocks.as_ref().clone()))
}

/// Start a background refresh of the whole universe.
async fn update_stocks(State(state): State<AppState>) -> Json<UpdateResponse> {
    let response = match state
        .refresh
        .trigger_refresh(state.stocks.as_ref().clone())
        .await
    {
        Some(job_id) => UpdateResponse {
            success: true,
            message: "Refresh started".to_string(),
            job_id: Some(job_id),
        },
        None => UpdateResponse {
            success: false,
            message: "A refresh is already running, check the task status later".to_string(),
            job_id: None,
        },
    };
    Json(response)
}

/// Stored analyses at or above the score threshold, best first.
async fn screen_stocks(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ListResponse<StockAnalysis>>> {
    let request = ScreenRequest::from_body(&body)?;
    let min_score = request.min_score.unwrap_or(state.config.screen.min_score);
    if min_score > 100 {
        return Err(AppError::BadRequest(format!(
            "minScore must be between 0 and 100, got {}",
            min_score
        )));
    }

    state
        .refresh
        .ensure_seeded(&state.stocks, state.config.screen.seed_count)
        .await;

    Ok(Json(ListResponse::new(
        state.store.screen(min_score, request.limit),
    )))
}

/// Fresh analysis of one stock.
async fn get_stock(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AnalysisResponse>> {
    let code = code.trim().to_uppercase();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::BadRequest(format!("Invalid stock code: {}", code)));
    }

    let stock = state
        .stocks
        .iter()
        .find(|s| s.code == code)
        .cloned()
        .unwrap_or_else(|| StockInfo::new(&code, &code));

    let analysis = state.refresh.analyze_with_timeout(&stock).await?;
    Ok(Json(AnalysisResponse {
        success: true,
        data: analysis,
    }))
}
