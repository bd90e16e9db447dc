use clap::{Parser, Subcommand};
use datasource::cache::CacheStore;
use datasource::fetcher::Fetcher;
use datasource::storage::{FilesystemStorage, MemoryStorage, StorageBackend};
use metrics_exporter_statsd::StatsdBuilder;
use relay::channel::JsonLinesChannel;
use relay::config::{RelayConfig, StatsdConfig};
use relay::protocol::{InboundRequest, RequestKind};
use relay::router::RequestRouter;
use relay::transmitter::Transmitter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flashback", about = "Relays F1 season data to a companion device")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send the season calendar
    Overview,
    /// Send the session schedule for one race
    RaceDetails {
        /// 1-based round number within the season
        #[arg(long)]
        round: u32,
    },
    /// Send the driver standings
    DriverStandings,
    /// Send the constructor standings
    TeamStandings,
}

impl Command {
    fn into_request(self) -> InboundRequest {
        match self {
            Command::Overview => InboundRequest {
                kind: RequestKind::Overview,
                param: None,
            },
            Command::RaceDetails { round } => InboundRequest {
                kind: RequestKind::RaceDetails,
                param: Some(round),
            },
            Command::DriverStandings => InboundRequest {
                kind: RequestKind::DriverStandings,
                param: None,
            },
            Command::TeamStandings => InboundRequest {
                kind: RequestKind::TeamStandings,
                param: None,
            },
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Validation(#[from] relay::config::ValidationError),
}

fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let config: RelayConfig = serde_yaml::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

fn install_statsd(config: &StatsdConfig) -> Result<(), String> {
    let recorder = StatsdBuilder::from(config.host.clone(), config.port)
        .build(Some("flashback"))
        .map_err(|e| e.to_string())?;
    metrics::set_global_recorder(recorder).map_err(|e| e.to_string())?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %cli.config.display(), error = %e, "Failed to load config");
            std::process::exit(1);
        }
    };

    if let Some(statsd) = &config.statsd {
        match install_statsd(statsd) {
            Ok(()) => {
                shared::metrics_defs::describe_all(datasource::metrics_defs::ALL_METRICS);
                shared::metrics_defs::describe_all(relay::metrics_defs::ALL_METRICS);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install statsd recorder, metrics disabled");
            }
        }
    }

    let backend: Arc<dyn StorageBackend> = match &config.cache.storage_dir {
        Some(dir) => Arc::new(FilesystemStorage::new(dir)),
        None => Arc::new(MemoryStorage::new()),
    };
    let cache = CacheStore::new(backend, Duration::from_secs(config.cache.ttl_secs));
    let fetcher = Fetcher::new(config.api.base_url.as_str(), cache);

    let transmitter = Transmitter::new(
        Arc::new(JsonLinesChannel),
        Duration::from_millis(config.transmit.pacing_interval_ms),
        config.transmit.strategy,
    );
    let router = RequestRouter::new(fetcher, transmitter, config.season);

    match router.handle(cli.command.into_request()).await {
        Ok(handle) => {
            // Keep the process alive until every scheduled send resolves.
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Transmission task panicked");
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Request failed");
            std::process::exit(1);
        }
    }
}
