//! Actuator command-line contract.

use punchclock_core::config::ArgStyle;
use punchclock_core::{Device, InvocationMode};

pub const PARAMS_FLAG: &str = "--params-system";
pub const SILENT_FLAG: &str = "--silent";

/// Build the argument vector for one device.
///
/// Structured style hands the whole device record over as JSON and appends
/// `--silent` for scheduled runs. Legacy style only knows the address and has
/// no silent switch.
pub fn actuator_args(style: ArgStyle, device: &Device, mode: InvocationMode) -> Vec<String> {
    match style {
        ArgStyle::Structured => {
            let mut args = vec![PARAMS_FLAG.to_string(), device.params_json()];
            if mode.is_silent() {
                args.push(SILENT_FLAG.to_string());
            }
            args
        }
        ArgStyle::Legacy => vec![
            "--ip".to_string(),
            device.ip_address.clone(),
            "--port".to_string(),
            device.port.to_string(),
        ],
    }
}
