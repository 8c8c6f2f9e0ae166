use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally — HTTP calculation service with a pluggable record ledger",
    version,
)]
pub struct Cli {
    /// Port to listen on (overrides TALLY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Storage backend: "memory" or "file" (overrides TALLY_STORAGE)
    #[arg(long)]
    pub storage: Option<String>,

    /// Record file path for the file backend (overrides TALLY_STORAGE_PATH)
    #[arg(long)]
    pub storage_path: Option<PathBuf>,

    /// Log level filter (overrides TALLY_LOG_LEVEL)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format (overrides TALLY_LOG_FORMAT)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}
