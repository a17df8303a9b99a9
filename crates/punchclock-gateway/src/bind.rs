use punchclock_core::config::ControlConfig;
use punchclock_core::PunchclockError;
use tokio::net::TcpListener;

/// Bind the control-plane listener on the configured address.
///
/// There is no fallback port: clients locate the service by its fixed
/// address, so an occupied port is fatal.
pub async fn bind_control_listener(control: &ControlConfig) -> Result<TcpListener, PunchclockError> {
    match TcpListener::bind(control.addr()).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => Err(PunchclockError::PortInUse {
            bind: control.bind.clone(),
            port: control.port,
        }),
        Err(e) => Err(PunchclockError::Io(e)),
    }
}
