use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use punchclock_core::config::{ArgStyle, PunchclockConfig};
use punchclock_core::{
    CycleReport, Device, DeviceInfo, InvocationMode, PunchclockError, Result, SyncCycle, SyncJob,
};
use punchclock_launcher::{
    actuator_args, ActuatorLocator, DetachedLauncher, LaunchError, ProcessLauncher,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::registry::{DeviceRegistry, HttpRegistry};

/// Result of a successful manual launch.
#[derive(Debug, Clone, Serialize)]
pub struct ManualLaunch {
    pub job_id: String,
    pub device: DeviceInfo,
}

/// Fans a device list out into one actuator launch per device.
pub struct SyncDispatcher {
    registry: Arc<dyn DeviceRegistry>,
    launcher: Arc<dyn ProcessLauncher>,
    locator: ActuatorLocator,
    arg_style: ArgStyle,
}

impl SyncDispatcher {
    pub fn new(
        registry: Arc<dyn DeviceRegistry>,
        launcher: Arc<dyn ProcessLauncher>,
        locator: ActuatorLocator,
        arg_style: ArgStyle,
    ) -> Self {
        Self {
            registry,
            launcher,
            locator,
            arg_style,
        }
    }

    /// Production wiring: HTTP registry, detached launcher, configured search.
    pub fn from_config(config: &PunchclockConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(HttpRegistry::new(&config.registry)?),
            Arc::new(DetachedLauncher),
            ActuatorLocator::from_config(&config.actuator),
            config.actuator.arg_style,
        ))
    }

    /// One scheduled cycle over the whole registry.
    ///
    /// Aborts (returns `Err`) only for cycle-wide problems: registry
    /// unreachable or actuator missing. Bad records and failed spawns are
    /// counted in the report and iteration moves on.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let records = self.registry.fetch_devices().await?;
        if records.is_empty() {
            info!("no devices to synchronize");
            return Ok(CycleReport::default());
        }
        info!(count = records.len(), "devices found");

        // Resolved once: a missing actuator is a cycle precondition, not a per-device error.
        let actuator = self.resolve_actuator()?;

        let mut report = CycleReport {
            devices: records.len(),
            ..CycleReport::default()
        };

        for (index, record) in records.iter().enumerate() {
            let device = match Device::from_record(record) {
                Ok(device) => device,
                Err(e) => {
                    warn!(index, error = %e, "skipping device record");
                    report.skipped += 1;
                    continue;
                }
            };

            let job = SyncJob::new(device, InvocationMode::Scheduled);
            match self.launch(&actuator, &job) {
                Ok(_) => report.launched += 1,
                Err(e) => {
                    warn!(job_id = %job.id, device = %job.device, error = %e, "actuator launch failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            devices = report.devices,
            launched = report.launched,
            skipped = report.skipped,
            failed = report.failed,
            "sync cycle finished"
        );
        Ok(report)
    }

    /// Launch the actuator interactively for a single operator-supplied record.
    ///
    /// Success means the process was started, not that the sync completed.
    pub fn run_manual(&self, record: &Value) -> Result<ManualLaunch> {
        let device = Device::from_record(record)?;
        let actuator = self.resolve_actuator()?;
        let job = SyncJob::new(device, InvocationMode::Manual);

        self.launch(&actuator, &job)
            .map_err(|e| PunchclockError::Spawn(e.to_string()))?;

        Ok(ManualLaunch {
            job_id: job.id,
            device: job.device.info(),
        })
    }

    fn resolve_actuator(&self) -> Result<PathBuf> {
        self.locator
            .resolve()
            .ok_or_else(|| PunchclockError::ActuatorNotFound {
                file_name: self.locator.file_name().to_string(),
            })
    }

    fn launch(&self, actuator: &Path, job: &SyncJob) -> std::result::Result<(), LaunchError> {
        let args = actuator_args(self.arg_style, &job.device, job.mode);
        debug!(job_id = %job.id, actuator = %actuator.display(), ?args, "launching actuator");

        let pid = self.launcher.invoke(actuator, &args).into_result()?;
        info!(
            job_id = %job.id,
            mode = %job.mode,
            device = %job.device,
            ?pid,
            "actuator launched"
        );
        Ok(())
    }
}

#[async_trait]
impl SyncCycle for SyncDispatcher {
    async fn run_cycle(&self) -> Result<CycleReport> {
        SyncDispatcher::run_cycle(self).await
    }
}
