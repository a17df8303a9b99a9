use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /status — liveness probe plus the service state snapshot.
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snapshot = state.service.snapshot();
    Json(json!({
        "status": snapshot.status,
        "uptime": snapshot.uptime,
        "start_time": snapshot.start_time,
        "shutdown_requested": snapshot.shutdown_requested,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}
