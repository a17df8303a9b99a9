use axum::{
    routing::{get, post},
    Router,
};
use punchclock_core::config::PunchclockConfig;
use punchclock_core::{ServiceState, ShutdownCoordinator};
use punchclock_dispatch::SyncDispatcher;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::http;

/// Shared state passed as `Arc<AppState>` to all handlers.
pub struct AppState {
    pub config: PunchclockConfig,
    pub service: ServiceState,
    /// Also drives the scheduler loop; both paths share one actuator lookup.
    pub dispatcher: Arc<SyncDispatcher>,
}

impl AppState {
    pub fn new(
        config: PunchclockConfig,
        dispatcher: Arc<SyncDispatcher>,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        Self {
            config,
            service: ServiceState::new(shutdown),
            dispatcher,
        }
    }

    pub fn shutdown(&self) -> &ShutdownCoordinator {
        self.service.shutdown()
    }
}

/// Routes exposed by the control plane, as `(method, path)`.
pub const ROUTES: [(&str, &str); 5] = [
    ("GET", "/status"),
    ("POST", "/execute-sync"),
    ("POST", "/shutdown"),
    ("GET", "/test"),
    ("POST", "/test"),
];

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(http::status::status_handler))
        .route("/execute-sync", post(http::sync::execute_sync_handler))
        .route("/shutdown", post(http::shutdown::shutdown_handler))
        .route(
            "/test",
            get(http::diagnostics::test_get_handler).post(http::diagnostics::test_post_handler),
        )
        .with_state(state)
        // local tooling calls from browser pages on other origins
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
