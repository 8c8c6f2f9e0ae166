use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tally_server::{LogConfig, ServerConfig, TallyServer};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let mut log_config = LogConfig::from_env();
    if let Some(level) = &cli.log_level {
        log_config.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        log_config.format = format.as_str().to_string();
    }
    init_tracing(&log_config);

    let mut config = ServerConfig::from_env();
    if let Some(port) = cli.port {
        config.bind_addr.set_port(port);
    }
    if let Some(storage) = cli.storage {
        config.storage_backend = storage;
    }
    if let Some(path) = cli.storage_path {
        config.storage_path = path;
    }

    let server = TallyServer::new(config)?;
    server.serve().await?;
    Ok(())
}

fn init_tracing(config: &LogConfig) {
    let (filter, invalid_level) = match EnvFilter::try_new(&config.level) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new("info"), true),
    };

    let invalid_format = match config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .init();
            false
        }
        "text" => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            false
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            true
        }
    };

    if invalid_level {
        warn!(level = %config.level, "invalid log level, defaulting to \"info\"");
    }
    if invalid_format {
        warn!(format = %config.format, "invalid log format, defaulting to \"text\"");
    }
}
