use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::error::{PunchclockError, Result};

/// Fields every device record must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 4] = ["id", "name", "ip_address", "port"];

/// A validated attendance device record.
///
/// Built once from a raw registry (or manual request) record. The original
/// object is kept so fields the service does not understand still reach the
/// actuator untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub ip_address: String,
    pub port: u16,
    record: Map<String, Value>,
}

impl Device {
    /// Validate a raw JSON record.
    ///
    /// A field counts as missing when it is absent, `null`, or a blank string.
    pub fn from_record(record: &Value) -> Result<Self> {
        let obj = record.as_object().ok_or_else(|| {
            PunchclockError::InvalidBody("device record must be a JSON object".to_string())
        })?;

        if let Some(field) = REQUIRED_FIELDS.iter().find(|f| is_blank(obj.get(**f))) {
            return Err(PunchclockError::MissingField {
                field: field.to_string(),
            });
        }

        Ok(Self {
            id: scalar_text("id", &obj["id"])?,
            name: scalar_text("name", &obj["name"])?,
            ip_address: scalar_text("ip_address", &obj["ip_address"])?,
            port: parse_port(&obj["port"])?,
            record: obj.clone(),
        })
    }

    /// The full record as compact JSON, as passed to `--params-system`.
    pub fn params_json(&self) -> String {
        Value::Object(self.record.clone()).to_string()
    }

    pub fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            ip: self.ip_address.clone(),
            port: self.port,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.ip_address, self.port)
    }
}

/// Device summary echoed back by the manual sync endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub ip: String,
    pub port: u16,
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn scalar_text(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(PunchclockError::InvalidField {
            field: field.to_string(),
            reason: "expected a string or number".to_string(),
        }),
    }
}

fn parse_port(value: &Value) -> Result<u16> {
    let invalid = |reason: &str| PunchclockError::InvalidField {
        field: "port".to_string(),
        reason: reason.to_string(),
    };
    let port = match value {
        Value::Number(n) => {
            let whole = match (n.as_u64(), n.as_i64(), n.as_f64()) {
                (Some(p), _, _) => p,
                (None, Some(_), _) => return Err(invalid("out of range")),
                // 4370.0 is a valid port written as a float
                (None, None, Some(f)) if f.fract() == 0.0 && f >= 0.0 && f <= u16::MAX as f64 => {
                    f as u64
                }
                (None, None, Some(f)) if f.fract() != 0.0 => return Err(invalid("not an integer")),
                _ => return Err(invalid("out of range")),
            };
            u16::try_from(whole).map_err(|_| invalid("out of range"))?
        }
        Value::String(s) => s.trim().parse::<u16>().map_err(|_| invalid("not a number"))?,
        _ => return Err(invalid("expected a string or number")),
    };
    if port == 0 {
        return Err(invalid("port 0 is not connectable"));
    }
    Ok(port)
}

/// What triggered an actuator launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationMode {
    /// Operator request via the control plane; the actuator shows its UI.
    Manual,
    /// Checkpoint-driven cycle; the actuator runs silently.
    Scheduled,
}

impl InvocationMode {
    pub fn is_silent(self) -> bool {
        matches!(self, InvocationMode::Scheduled)
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationMode::Manual => write!(f, "manual"),
            InvocationMode::Scheduled => write!(f, "scheduled"),
        }
    }
}

/// One actuator invocation. Lives only as long as the spawn call.
#[derive(Debug, Clone)]
pub struct SyncJob {
    /// UUIDv7, only used to correlate log lines.
    pub id: String,
    pub device: Device,
    pub mode: InvocationMode,
    pub created_at: DateTime<Local>,
}

impl SyncJob {
    pub fn new(device: Device, mode: InvocationMode) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            device,
            mode,
            created_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numeric_and_string_fields() {
        let device = Device::from_record(&json!({
            "id": 7,
            "name": "Front door",
            "ip_address": "192.168.1.201",
            "port": "4370",
            "location": "Lobby"
        }))
        .unwrap();
        assert_eq!(device.id, "7");
        assert_eq!(device.port, 4370);
        assert_eq!(device.to_string(), "Front door (192.168.1.201:4370)");
    }

    #[test]
    fn params_json_keeps_extra_fields() {
        let device = Device::from_record(&json!({
            "id": 1,
            "name": "Almacén",
            "ip_address": "10.0.0.2",
            "port": 4370,
            "company_id": 99
        }))
        .unwrap();
        let params: Value = serde_json::from_str(&device.params_json()).unwrap();
        assert_eq!(params["company_id"], 99);
        // non-ASCII is written as-is, not escaped
        assert!(device.params_json().contains("Almacén"));
    }

    #[test]
    fn reports_first_missing_field() {
        let err = Device::from_record(&json!({
            "id": 1,
            "name": "Gate",
            "ip_address": "10.0.0.3"
        }))
        .unwrap_err();
        match err {
            PunchclockError::MissingField { field } => assert_eq!(field, "port"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn null_and_blank_count_as_missing() {
        let null_ip = json!({"id": 1, "name": "A", "ip_address": null, "port": 4370});
        let blank_ip = json!({"id": 1, "name": "A", "ip_address": "  ", "port": 4370});
        for record in [null_ip, blank_ip] {
            assert!(matches!(
                Device::from_record(&record),
                Err(PunchclockError::MissingField { ref field }) if field == "ip_address"
            ));
        }
    }

    #[test]
    fn rejects_bad_ports() {
        for port in [json!(0), json!(70000), json!("abc"), json!(true)] {
            let record = json!({"id": 1, "name": "A", "ip_address": "10.0.0.4", "port": port});
            assert!(matches!(
                Device::from_record(&record),
                Err(PunchclockError::InvalidField { ref field, .. }) if field == "port"
            ));
        }
    }

    #[test]
    fn float_ports_must_be_whole() {
        let record = |port: Value| json!({"id": 1, "name": "A", "ip_address": "10.0.0.4", "port": port});

        let device = Device::from_record(&record(json!(4370.0))).unwrap();
        assert_eq!(device.port, 4370);

        match Device::from_record(&record(json!(4370.5))) {
            Err(PunchclockError::InvalidField { field, reason }) => {
                assert_eq!(field, "port");
                assert_eq!(reason, "not an integer");
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }

        for port in [json!(-1), json!(70000.0)] {
            match Device::from_record(&record(port)) {
                Err(PunchclockError::InvalidField { reason, .. }) => assert_eq!(reason, "out of range"),
                other => panic!("expected InvalidField, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_non_object_record() {
        assert!(matches!(
            Device::from_record(&json!(["10.0.0.1", 4370])),
            Err(PunchclockError::InvalidBody(_))
        ));
    }

    #[test]
    fn only_scheduled_jobs_are_silent() {
        assert!(InvocationMode::Scheduled.is_silent());
        assert!(!InvocationMode::Manual.is_silent());
    }
}
