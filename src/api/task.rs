//! Refresh job status endpoint.

use crate::types::TaskStatus;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};

/// Create the task router.
pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(get_status))
}

/// Progress of the background refresh.
async fn get_status(State(state): State<AppState>) -> Json<TaskStatus> {
    Json(state.store.status().await)
}
