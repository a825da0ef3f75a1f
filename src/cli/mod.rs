//! CLI interface and argument parsing
//!
//! The job has a single entry point; the flags below plus the environment
//! described in [`crate::config`] are its whole input.

pub mod commands;

use clap::Parser;
use std::path::PathBuf;

/// GA4 daily partition transfer (BigQuery -> GCS -> S3)
#[derive(Parser, Debug)]
#[command(name = "ga4-transfer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long, env = "GA4_TRANSFER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GA4_TRANSFER_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(flatten)]
    pub transfer: commands::transfer::TransferArgs,
}
