//! adit daemon: entry point for running the mining backend.

mod config;
mod logging;
mod shutdown;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use adit_engine::MiningEngine;
use adit_rpc::RpcServer;
use adit_store_lmdb::LmdbStore;

use config::ServiceConfig;
use logging::LogFormat;
use shutdown::StopSignal;

#[derive(Parser)]
#[command(name = "adit-daemon", about = "adit mining backend daemon")]
struct Cli {
    /// Data directory for the LMDB store.
    #[arg(long, env = "ADIT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address the HTTP API binds to.
    #[arg(long, env = "ADIT_BIND")]
    bind: Option<String>,

    /// Port for the HTTP API.
    #[arg(long, env = "ADIT_PORT")]
    port: Option<u16>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ADIT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ADIT_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ADIT_CONFIG")]
    config: Option<PathBuf>,
}

/// Where the effective base configuration came from, reported once
/// logging is up.
enum ConfigSource {
    Defaults,
    File(PathBuf),
    FileError { path: PathBuf, error: String },
}

fn load_base_config(path: Option<&PathBuf>) -> (ServiceConfig, ConfigSource) {
    match path {
        None => (ServiceConfig::default(), ConfigSource::Defaults),
        Some(path) => match ServiceConfig::from_toml_file(path) {
            Ok(config) => (config, ConfigSource::File(path.clone())),
            Err(e) => (
                ServiceConfig::default(),
                ConfigSource::FileError {
                    path: path.clone(),
                    error: format!("{e:#}"),
                },
            ),
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, source) = load_base_config(cli.config.as_ref());
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    if let Some(log_format) = cli.log_format {
        config.log_format = log_format;
    }

    logging::init_logging(LogFormat::parse(&config.log_format), &config.log_level);

    match source {
        ConfigSource::Defaults => {}
        ConfigSource::File(path) => info!("loaded config from {}", path.display()),
        ConfigSource::FileError { path, error } => warn!(
            "failed to load config file {}: {error}, using defaults",
            path.display()
        ),
    }

    let addr = config.socket_addr()?;
    info!(
        data_dir = %config.data_dir.display(),
        %addr,
        "starting adit daemon"
    );

    let store = LmdbStore::open(&config.data_dir, config.map_size_bytes())?;
    let engine = Arc::new(MiningEngine::new(Arc::new(store)));
    if engine.seed_default_params()? {
        info!("seeded default mining parameters");
    }

    let stop = StopSignal::new();
    let watcher = stop.watcher();
    tokio::spawn(async move { stop.listen().await });

    RpcServer::new(addr, engine).start(watcher.stopped()).await?;

    info!("adit daemon exited cleanly");
    Ok(())
}
