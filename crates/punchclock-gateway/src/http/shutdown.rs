use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// POST /shutdown — set the shutdown signal and answer right away.
///
/// The server stops accepting connections once the signal fires; requests
/// already in flight still complete.
pub async fn shutdown_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.shutdown().request("control-plane");
    Json(json!({"message": "service shutting down"}))
}
