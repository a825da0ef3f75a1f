// GA4 Transfer - BigQuery to S3 daily partition job
// Copyright (c) 2025 GA4 Transfer Contributors
// Licensed under the MIT License

use clap::Parser;
use ga4_transfer::cli::Cli;
use ga4_transfer::config::Environment;
use std::collections::HashMap;
use std::process;

/// Exit code when the run is interrupted by SIGINT
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    // Local runs pick up a .env file; managed batch runs never do
    let environment = std::env::var("ENV")
        .map(|value| Environment::from_env_value(&value))
        .unwrap_or_default();
    if environment != Environment::Production {
        let _ = dotenvy::dotenv();
    }

    let cli = Cli::parse();

    // Single environment snapshot handed to every component
    let env: HashMap<String, String> = std::env::vars().collect();

    let run = cli
        .transfer
        .execute(cli.config.as_deref(), cli.log_level.as_deref(), &env);

    // Dropping the run on a signal removes the credential file through its guard
    let exit_code = tokio::select! {
        result = run => match result {
            Ok(code) => code,
            Err(e) => {
                tracing::error!(error = %e, "Transfer execution failed");
                eprintln!("Error: {e:#}");
                5
            }
        },
        code = shutdown_signal() => code,
    };

    process::exit(exit_code);
}

/// Resolves with the exit code to use once SIGINT or SIGTERM arrives
async fn shutdown_signal() -> i32 {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                return wait_for_ctrl_c().await;
            }
        };

        tokio::select! {
            code = wait_for_ctrl_c() => code,
            _ = sigterm.recv() => {
                tracing::warn!("Received SIGTERM, aborting transfer");
                143
            }
        }
    }

    #[cfg(not(unix))]
    {
        wait_for_ctrl_c().await
    }
}

async fn wait_for_ctrl_c() -> i32 {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("Received SIGINT (Ctrl+C), aborting transfer");
            EXIT_INTERRUPTED
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<i32>().await
        }
    }
}
