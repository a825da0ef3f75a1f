//! Transfer command implementation
//!
//! Loads configuration, installs logging and wires the production adapters
//! into a [`PipelineOrchestrator`] for one run.

use crate::adapters::process::{CommandRunner, DryRunRunner, ProcessRunner};
use crate::adapters::secrets::AwsSecretsManager;
use crate::config::load_config;
use crate::core::context::ExecutionContext;
use crate::core::pipeline::PipelineOrchestrator;
use crate::logging::init_logging;
use clap::Args;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Arguments for a transfer run
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Partition date to transfer (YYYY-MM-DD); defaults to two days ago in UTC+9
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub target_date: Option<String>,

    /// Log every external command instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

impl TransferArgs {
    /// Execute one transfer run and return the process exit code
    ///
    /// `env` is the process environment captured once at startup.
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        log_level: Option<&str>,
        env: &HashMap<String, String>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path, env) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(e.exit_code());
            }
        };

        if let Some(level) = log_level {
            config.application.log_level = level.to_string();
        }

        let _log_guard = match init_logging(&config.application.log_level, &config.logging) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Failed to initialize logging: {e}");
                return Ok(e.exit_code());
            }
        };

        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = ?config.application.environment,
            secret_name = %config.aws.secret_name,
            "GA4 transfer starting"
        );

        let context = ExecutionContext::new(env, &config);
        let store = AwsSecretsManager::connect(&config.aws.region, &config.aws.identity()).await;

        let runner: Arc<dyn CommandRunner> = if self.dry_run {
            tracing::info!("Dry run mode enabled - external commands will not be executed");
            Arc::new(DryRunRunner)
        } else {
            Arc::new(ProcessRunner::new())
        };

        let orchestrator = PipelineOrchestrator::new(config, context, Arc::new(store), runner)
            .with_dry_run(self.dry_run);

        match orchestrator
            .run(self.target_date.as_deref(), chrono::Utc::now())
            .await
        {
            Ok(report) => {
                tracing::debug!(
                    run_id = %report.run_id,
                    stages = report.stages.len(),
                    final_stage = %report.final_stage(),
                    "Run report"
                );
                Ok(0)
            }
            Err(failure) => Ok(failure.exit_code()),
        }
    }
}
