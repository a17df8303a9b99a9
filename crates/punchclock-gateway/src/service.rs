//! The long-running service: control plane plus scheduler, bound to one
//! shutdown signal.

use anyhow::Context;
use punchclock_core::config::PunchclockConfig;
use punchclock_core::ShutdownCoordinator;
use punchclock_dispatch::SyncDispatcher;
use punchclock_scheduler::{LocalClock, SchedulerLoop};
use std::io::BufRead;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{app, bind};

/// Run until shutdown is requested from HTTP, a signal, or the console.
///
/// Fails fast, before anything else starts, when the control port is taken.
pub async fn run(config: PunchclockConfig, console: bool) -> anyhow::Result<()> {
    let listener = bind::bind_control_listener(&config.control).await?;
    serve(listener, config, console).await
}

/// Serve the control plane and run the scheduler on an already bound listener.
async fn serve(listener: TcpListener, config: PunchclockConfig, console: bool) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;

    let shutdown = ShutdownCoordinator::new();
    let dispatcher = Arc::new(
        SyncDispatcher::from_config(&config).context("failed to build sync dispatcher")?,
    );
    let state = Arc::new(app::AppState::new(config, dispatcher, shutdown.clone()));

    let scheduler = spawn_scheduler(&state);
    spawn_signal_listener(shutdown.clone());
    if console {
        spawn_console_listener(shutdown.clone());
    }

    state.service.mark_running();
    info!(
        %addr,
        registry = %state.config.registry.devices_url(),
        "punchclock control plane listening"
    );
    for (method, path) in app::ROUTES {
        info!("  {method:<4} {path}");
    }

    let graceful = shutdown.clone();
    let served = axum::serve(listener, app::build_router(state.clone()))
        .with_graceful_shutdown(async move { graceful.cancelled().await })
        .await;

    // The server can also stop on its own error; the scheduler must follow.
    shutdown.request("server-exit");
    state.service.mark_stopped();

    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            warn!(error = %e, "scheduler task ended abnormally");
        }
    }
    info!("punchclock stopped");

    served.context("control plane server failed")
}

/// Start the scheduler loop unless one is already running for this state.
fn spawn_scheduler(state: &Arc<app::AppState>) -> Option<JoinHandle<()>> {
    if !state.service.claim_scheduler() {
        warn!("scheduler already running; not starting another");
        return None;
    }

    let scheduler = SchedulerLoop::new(
        state.dispatcher.clone(),
        Arc::new(LocalClock),
        state.shutdown().clone(),
    );
    info!(next = %scheduler.upcoming(), "automatic sync enabled");
    Some(tokio::spawn(scheduler.run()))
}

fn spawn_signal_listener(shutdown: ShutdownCoordinator) {
    tokio::spawn(async move {
        tokio::select! {
            _ = wait_for_signal() => {
                shutdown.request("signal");
            }
            _ = shutdown.cancelled() => {}
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            warn!(error = %e, "SIGTERM handler unavailable; listening for Ctrl-C only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Watch stdin for `stop`; end of input counts as `stop` too.
///
/// Detached OS thread, not the Tokio blocking pool: the runtime must not
/// wait on a pending read when it shuts down.
fn spawn_console_listener(shutdown: ShutdownCoordinator) {
    info!("console mode: type 'stop' to shut down");
    let spawned = std::thread::Builder::new()
        .name("punchclock-console".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) if line.trim().eq_ignore_ascii_case("stop") => {
                        shutdown.request("console");
                        return;
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
                if shutdown.is_requested() {
                    return;
                }
            }
            shutdown.request("console-eof");
        });
    if let Err(e) = spawned {
        warn!(error = %e, "console listener not started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ControlClient;
    use punchclock_core::config::ControlConfig;
    use punchclock_core::PunchclockError;
    use serde_json::json;
    use std::time::Duration;

    /// Config whose registry refuses connections and whose actuator is absent.
    async fn isolated_config(port: u16) -> PunchclockConfig {
        let refused = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let registry_port = refused.local_addr().unwrap().port();
        drop(refused);

        let mut config = PunchclockConfig::default();
        config.control = ControlConfig {
            bind: "127.0.0.1".to_string(),
            port,
        };
        config.registry.base_url = format!("http://127.0.0.1:{registry_port}");
        config.registry.timeout_secs = 1;
        config.actuator.file_name = "punchclock-service-test-actuator-7c2e".to_string();
        config
    }

    #[tokio::test]
    async fn shutdown_request_stops_server_and_scheduler() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = isolated_config(listener.local_addr().unwrap().port()).await;
        let client = ControlClient::new(&config.control).unwrap();
        let execute_url = format!("{}/execute-sync", client.base_url());
        let service = tokio::spawn(serve(listener, config, false));

        let status = client.status().await.unwrap();
        assert_eq!(status["status"], "running");
        assert_eq!(status["shutdown_requested"], false);

        // a manual request gets its own answer while the service is up
        let response = reqwest::Client::new()
            .post(&execute_url)
            .json(&json!({"id": 1, "name": "Gate", "ip_address": "10.0.0.9", "port": 4370}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

        let ack = client.request_shutdown().await.unwrap();
        assert!(ack["message"].is_string());

        tokio::time::timeout(Duration::from_secs(5), service)
            .await
            .expect("service should stop after /shutdown")
            .unwrap()
            .unwrap();
        assert!(!client.is_running().await);
    }

    #[tokio::test]
    async fn taken_port_fails_before_serving() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = isolated_config(taken.local_addr().unwrap().port()).await;

        let err = tokio::time::timeout(Duration::from_secs(5), run(config, false))
            .await
            .expect("run should fail fast")
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PunchclockError>(),
            Some(PunchclockError::PortInUse { .. })
        ));
    }
}
