use std::time::Duration;

use async_trait::async_trait;
use punchclock_core::config::RegistryConfig;
use punchclock_core::{PunchclockError, Result};
use serde_json::Value;
use tracing::debug;

const USER_AGENT: &str = concat!("punchclock/", env!("CARGO_PKG_VERSION"));

/// Source of device records for a cycle.
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Fetch the current raw device records.
    ///
    /// `Ok(vec![])` when the registry answered with anything other than a
    /// JSON array. `Err(Transport)` when it could not be reached or did not
    /// return JSON.
    async fn fetch_devices(&self) -> Result<Vec<Value>>;
}

/// Registry client over HTTP (`GET {base_url}/{devices_path}`).
pub struct HttpRegistry {
    client: reqwest::Client,
    url: String,
}

impl HttpRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PunchclockError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.devices_url(),
        })
    }
}

#[async_trait]
impl DeviceRegistry for HttpRegistry {
    async fn fetch_devices(&self) -> Result<Vec<Value>> {
        let body: Value = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        match body {
            Value::Array(records) => Ok(records),
            other => {
                debug!(url = %self.url, kind = json_kind(&other), "registry response is not a list");
                Ok(Vec::new())
            }
        }
    }
}

fn transport(e: reqwest::Error) -> PunchclockError {
    PunchclockError::Transport(e.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
