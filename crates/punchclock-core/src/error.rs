use thiserror::Error;

#[derive(Debug, Error)]
pub enum PunchclockError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Port {port} on {bind} is already in use")]
    PortInUse { bind: String, port: u16 },

    #[error("Actuator executable not found: {file_name}")]
    ActuatorNotFound { file_name: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Device registry unreachable: {0}")]
    Transport(String),

    #[error("Actuator spawn failed: {0}")]
    Spawn(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used to decide how far an error may travel.
///
/// Configuration errors abort the operation that hit them, validation errors
/// go back to the caller, transport errors abort the current cycle, and
/// spawn errors are contained to one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Transport,
    Spawn,
    Internal,
}

impl PunchclockError {
    /// Short error code string returned to control-plane clients.
    pub fn code(&self) -> &'static str {
        match self {
            PunchclockError::Config(_) => "CONFIG_ERROR",
            PunchclockError::PortInUse { .. } => "PORT_IN_USE",
            PunchclockError::ActuatorNotFound { .. } => "ACTUATOR_NOT_FOUND",
            PunchclockError::MissingField { .. } => "MISSING_FIELD",
            PunchclockError::InvalidField { .. } => "INVALID_FIELD",
            PunchclockError::InvalidBody(_) => "INVALID_BODY",
            PunchclockError::Transport(_) => "TRANSPORT_ERROR",
            PunchclockError::Spawn(_) => "SPAWN_ERROR",
            PunchclockError::Io(_) => "IO_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PunchclockError::Config(_)
            | PunchclockError::PortInUse { .. }
            | PunchclockError::ActuatorNotFound { .. } => ErrorKind::Configuration,
            PunchclockError::MissingField { .. }
            | PunchclockError::InvalidField { .. }
            | PunchclockError::InvalidBody(_) => ErrorKind::Validation,
            PunchclockError::Transport(_) => ErrorKind::Transport,
            PunchclockError::Spawn(_) => ErrorKind::Spawn,
            PunchclockError::Io(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, PunchclockError>;
