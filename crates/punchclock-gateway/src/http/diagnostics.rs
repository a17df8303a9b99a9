//! `/test` — connectivity check for clients. No side effects.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;

/// GET /test
pub async fn test_get_handler() -> Json<Value> {
    Json(json!({"message": "server is working", "method": "GET"}))
}

/// POST /test — echo the body back: form fields as an object, JSON as-is,
/// anything else as text.
pub async fn test_post_handler(request: Request) -> Json<Value> {
    let data = if is_form(&request) {
        match Form::<HashMap<String, String>>::from_request(request, &()).await {
            Ok(Form(fields)) => json!(fields),
            Err(_) => Value::Null,
        }
    } else {
        match Bytes::from_request(request, &()).await {
            Ok(body) => echo_bytes(&body),
            Err(_) => Value::Null,
        }
    };
    Json(json!({"message": "POST received", "data": data, "method": "POST"}))
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

fn echo_bytes(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
