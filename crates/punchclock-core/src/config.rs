use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3322;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:8000/api/zkteco";
pub const DEFAULT_DEVICES_PATH: &str = "devices";
pub const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 10;

#[cfg(windows)]
pub const DEFAULT_ACTUATOR_FILE_NAME: &str = "ZKTeco-Sync.exe";
#[cfg(not(windows))]
pub const DEFAULT_ACTUATOR_FILE_NAME: &str = "zkteco-sync";

/// Top-level config (punchclock.toml + PUNCHCLOCK_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PunchclockConfig {
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub actuator: ActuatorConfig,
}

/// Local HTTP control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl ControlConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host(), self.port)
    }

    /// Base URL a local client uses to reach the control plane.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host(), self.port)
    }

    /// `bind` with IPv6 literals bracketed.
    fn host(&self) -> String {
        let bind = self.bind.trim_start_matches('[').trim_end_matches(']');
        match bind.parse::<std::net::IpAddr>() {
            Ok(std::net::IpAddr::V6(_)) => format!("[{bind}]"),
            _ => bind.to_string(),
        }
    }
}

/// Remote device registry API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_url")]
    pub base_url: String,
    #[serde(default = "default_devices_path")]
    pub devices_path: String,
    /// Upper bound on the device list fetch, connect + read.
    #[serde(default = "default_registry_timeout")]
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_registry_url(),
            devices_path: default_devices_path(),
            timeout_secs: default_registry_timeout(),
        }
    }
}

impl RegistryConfig {
    /// Full URL of the device list endpoint.
    pub fn devices_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.devices_path.trim_start_matches('/')
        )
    }
}

/// How actuator arguments are laid out on the command line.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ArgStyle {
    /// `--params-system <json> [--silent]`
    #[default]
    Structured,
    /// `--ip <ip> --port <port>`
    Legacy,
}

/// External sync actuator executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Explicit executable path. Checked first when set.
    #[serde(default)]
    pub path: Option<String>,
    /// Directories searched for `file_name`, in order.
    #[serde(default)]
    pub search_dirs: Vec<String>,
    #[serde(default = "default_actuator_file_name")]
    pub file_name: String,
    #[serde(default)]
    pub arg_style: ArgStyle,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            path: None,
            search_dirs: Vec::new(),
            file_name: default_actuator_file_name(),
            arg_style: ArgStyle::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}
fn default_devices_path() -> String {
    DEFAULT_DEVICES_PATH.to_string()
}
fn default_registry_timeout() -> u64 {
    DEFAULT_REGISTRY_TIMEOUT_SECS
}
fn default_actuator_file_name() -> String {
    DEFAULT_ACTUATOR_FILE_NAME.to_string()
}

impl PunchclockConfig {
    /// Load config from a TOML file with PUNCHCLOCK_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.punchclock/punchclock.toml
    ///
    /// Nested keys use a double underscore, e.g. `PUNCHCLOCK_CONTROL__PORT`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Self::from_figment(
            Figment::from(Serialized::defaults(PunchclockConfig::default()))
                .merge(Toml::file(&path))
                .merge(Env::prefixed("PUNCHCLOCK_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> crate::error::Result<Self> {
        figment
            .extract()
            .map_err(|e| crate::error::PunchclockError::Config(e.to_string()))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    format!("{}/.punchclock/punchclock.toml", home)
}
