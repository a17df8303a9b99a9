//! Manual sync trigger — POST /execute-sync.
//!
//! Takes one device record in the body, validates it, and starts the
//! actuator interactively for that device. The response only means the
//! process was started; the sync itself runs on its own.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use punchclock_core::{ErrorKind, PunchclockError};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::AppState;

/// POST /execute-sync
///
/// 200 when the actuator was launched, 400 for a bad record, 404 when the
/// actuator cannot be found, 500 when the launch itself failed.
pub async fn execute_sync_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let record = parse_record(&body).map_err(|e| {
        warn!(bytes = body.len(), error = %e, "rejected sync request body");
        error_response(&e)
    })?;

    let launch = state.dispatcher.run_manual(&record).map_err(|e| {
        warn!(code = e.code(), error = %e, "manual sync not started");
        error_response(&e)
    })?;

    info!(job_id = %launch.job_id, device_id = %launch.device.id, "manual sync started");
    Ok(Json(json!({
        "success": true,
        "message": "sync started",
        "job_id": launch.job_id,
        "device_info": launch.device,
    })))
}

fn parse_record(body: &[u8]) -> Result<Value, PunchclockError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(PunchclockError::InvalidBody("no data received".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| PunchclockError::InvalidBody(e.to_string()))
}

fn error_response(e: &PunchclockError) -> (StatusCode, Json<Value>) {
    let status = match (e.kind(), e) {
        (ErrorKind::Validation, _) => StatusCode::BAD_REQUEST,
        (_, PunchclockError::ActuatorNotFound { .. }) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut body = json!({
        "success": false,
        "code": e.code(),
        "message": e.to_string(),
    });
    if let PunchclockError::MissingField { field } | PunchclockError::InvalidField { field, .. } = e {
        body["field"] = json!(field);
    }
    (status, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_error_kind() {
        let cases = [
            (PunchclockError::MissingField { field: "port".into() }, StatusCode::BAD_REQUEST),
            (
                PunchclockError::InvalidField {
                    field: "port".into(),
                    reason: "not an integer".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (PunchclockError::InvalidBody("empty".into()), StatusCode::BAD_REQUEST),
            (
                PunchclockError::ActuatorNotFound { file_name: "zkteco-sync".into() },
                StatusCode::NOT_FOUND,
            ),
            (PunchclockError::Spawn("denied".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (PunchclockError::Config("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                PunchclockError::Io(std::io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let (status, body) = error_response(&err);
            assert_eq!(status, expected, "{err}");
            assert_eq!(body.0["code"], err.code());
        }
    }
}
