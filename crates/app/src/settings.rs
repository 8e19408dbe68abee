//! Handles settings for the application. Configuration is read from
//! `config/splitledger.toml`, then `SPLITLEDGER_*` environment variables,
//! then command line flags.
use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/splitledger.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub snapshot_path: String,
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_path: "data/ledger.json".to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "splitledger", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the snapshot file path.
    #[arg(long)]
    snapshot: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SPLITLEDGER"))
            .build()?
            .try_deserialize()?;

        if let Some(snapshot) = args.snapshot {
            settings.snapshot_path = snapshot;
        }
        if let Some(level) = args.level {
            settings.level = level;
        }

        Ok(settings)
    }
}
