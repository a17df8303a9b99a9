use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, info, warn};

mod app;
mod bind;
mod client;
mod http;
mod service;

use client::ControlClient;
use punchclock_core::config::PunchclockConfig;

#[derive(Parser)]
#[command(name = "punchclock", version, about = "ZKTeco attendance sync service")]
struct Cli {
    /// Config file (defaults to $PUNCHCLOCK_CONFIG, then ~/.punchclock/punchclock.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the service in the foreground
    Start {
        /// Also accept `stop` on stdin
        #[arg(long)]
        console: bool,
    },
    /// Ask a running service to shut down
    Stop,
    /// Print the status of a running service
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "punchclock_gateway=info,punchclock_dispatch=info,punchclock_scheduler=info,punchclock_core=info,tower_http=info".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // explicit path > PUNCHCLOCK_CONFIG env > ~/.punchclock/punchclock.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("PUNCHCLOCK_CONFIG").ok());
    let config = PunchclockConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        PunchclockConfig::default()
    });

    match run(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: PunchclockConfig) -> anyhow::Result<ExitCode> {
    let client = ControlClient::new(&config.control)?;

    match command {
        Command::Start { console } => {
            if client.is_running().await {
                error!(url = %client.base_url(), "service is already running");
                return Ok(ExitCode::FAILURE);
            }
            service::run(config, console).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Stop => match client.request_shutdown().await {
            Ok(_) => {
                info!(url = %client.base_url(), "shutdown requested");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                error!("could not stop service: {e:#}");
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Status => match client.status().await {
            Ok(status) => {
                println!("{}", serde_json::to_string_pretty(&status)?);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                error!("service is not running: {e:#}");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
