//! Client side of the control plane, used by the `stop` and `status`
//! subcommands and by `start` to detect an instance that is already up.

use anyhow::Context;
use punchclock_core::config::ControlConfig;
use serde_json::Value;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ControlClient {
    client: reqwest::Client,
    base_url: String,
}

impl ControlClient {
    pub fn new(control: &ControlConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("punchclock/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: control.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch `GET /status` from a running service.
    pub async fn status(&self) -> anyhow::Result<Value> {
        self.client
            .get(format!("{}/status", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("service not reachable at {}", self.base_url))?
            .error_for_status()?
            .json()
            .await
            .context("invalid status response")
    }

    /// True when something answers `/status` on the control address.
    pub async fn is_running(&self) -> bool {
        self.status().await.is_ok()
    }

    /// Ask a running service to stop via `POST /shutdown`.
    pub async fn request_shutdown(&self) -> anyhow::Result<Value> {
        self.client
            .post(format!("{}/shutdown", self.base_url))
            .timeout(SHUTDOWN_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("service not reachable at {}", self.base_url))?
            .error_for_status()?
            .json()
            .await
            .context("invalid shutdown response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    async fn serve(router: Router) -> ControlConfig {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        ControlConfig {
            bind: "127.0.0.1".to_string(),
            port,
        }
    }

    #[tokio::test]
    async fn talks_to_a_running_service() {
        let control = serve(
            Router::new()
                .route("/status", get(|| async { Json(json!({"status": "running"})) }))
                .route(
                    "/shutdown",
                    post(|| async { Json(json!({"message": "service shutting down"})) }),
                ),
        )
        .await;
        let client = ControlClient::new(&control).unwrap();

        assert!(client.is_running().await);
        assert_eq!(client.status().await.unwrap()["status"], "running");
        assert!(client.request_shutdown().await.unwrap()["message"].is_string());
    }

    #[tokio::test]
    async fn nothing_listening_means_not_running() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let control = ControlConfig {
            bind: "127.0.0.1".to_string(),
            port: listener.local_addr().unwrap().port(),
        };
        drop(listener);
        let client = ControlClient::new(&control).unwrap();

        assert!(!client.is_running().await);
        assert!(client.request_shutdown().await.is_err());
    }
}
