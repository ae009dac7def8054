//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Binary entrypoint for the Workshop daemon."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
mod api;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::signal;
use tracing::{info, warn};
use workshop_adapter::WorkshopAdapter;
use workshop_common::config::AppConfig;
use workshop_common::logging::{init_tracing, LogFormat};
use workshop_host::{AdapterCatalog, AdapterHost};

use crate::api::spawn_api_server;

const DEFAULT_CONFIG: &str = "configs/workshop.toml";

#[derive(Debug, Parser)]
#[command(author, version, about = "Workshop adapter daemon", long_about = None)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, help = "Override the configured stdout log format")]
    log_format: Option<CliLogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Json,
    Pretty,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Json => LogFormat::StructuredJson,
            CliLogFormat::Pretty => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Host the configured adapters and serve the API")]
    Run,
    #[command(about = "Print one adapter value as JSON and exit")]
    Dump {
        adapter: String,
        #[arg(default_value = "")]
        path: String,
        #[arg(long, help = "Include per-parameter metadata")]
        metadata: bool,
    },
}

fn catalog() -> AdapterCatalog {
    AdapterCatalog::new().with(workshop_adapter::MODULE_NAME, WorkshopAdapter::factory)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from(DEFAULT_CONFIG));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }
    init_tracing("workshopd", &config.logging)?;
    info!(
        config_path = %loaded.source.display(),
        adapters = config.adapters.len(),
        "configuration loaded"
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_daemon(config).await?,
        Commands::Dump {
            adapter,
            path,
            metadata,
        } => dump(config, &adapter, &path, metadata).await?,
    }

    Ok(())
}

async fn run_daemon(config: AppConfig) -> Result<()> {
    let adapters = catalog()
        .create_all(&config.adapters)
        .context("failed to load adapters")?;
    let runtime = AdapterHost::from_adapters(adapters).start();

    let api_server = if config.api.enabled {
        let server = spawn_api_server(runtime.handle(), config.api.listen)?;
        info!(address = %server.addr(), "parameter api enabled");
        Some(server)
    } else {
        info!("api server disabled by configuration");
        None
    };

    info!("daemon running; waiting for termination signal");
    signal::ctrl_c().await?;
    info!("ctrl-c received; shutting down");

    if let Some(server) = api_server {
        if let Err(err) = server.shutdown().await {
            warn!(error = %err, "api server did not shut down cleanly");
        }
    }
    runtime.shutdown().await?;
    Ok(())
}

async fn dump(config: AppConfig, adapter: &str, path: &str, with_metadata: bool) -> Result<()> {
    let adapters = catalog()
        .create_all(&config.adapters)
        .context("failed to load adapters")?;
    let runtime = AdapterHost::from_adapters(adapters).start();
    let result = runtime.handle().get(adapter, path, with_metadata).await;
    runtime.shutdown().await?;

    let value = result.with_context(|| format!("failed to read {adapter}/{path}"))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
