//! Core business logic for the transfer job.
//!
//! # Modules
//!
//! - [`date`] - Partition date resolution
//! - [`credentials`] - Credential document materialization
//! - [`context`] - Environment handed to external tools
//! - [`pipeline`] - Stage sequencing and tool command construction
//!
//! # Transfer Workflow
//!
//! 1. **Resolve date**: `--target-date` or two days before now in UTC+9
//! 2. **Resolve secret**: fetch the secret bundle and check required keys
//! 3. **Write credentials**: decode the service-account document to disk
//! 4. **Initialize project**: `gcloud config set project`
//! 5. **Authenticate**: `gcloud auth activate-service-account`
//! 6. **Export**: `bq extract` of `events_<YYYYMMDD>` to the staging bucket
//! 7. **Sync**: `gcloud storage rsync` staging into the durable bucket
//!
//! # Example
//!
//! ```rust,no_run
//! use ga4_transfer::adapters::process::ProcessRunner;
//! use ga4_transfer::adapters::secrets::AwsSecretsManager;
//! use ga4_transfer::config::load_config;
//! use ga4_transfer::core::context::ExecutionContext;
//! use ga4_transfer::core::pipeline::PipelineOrchestrator;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env: HashMap<String, String> = std::env::vars().collect();
//! let config = load_config(None, &env)?;
//! let context = ExecutionContext::new(&env, &config);
//! let store = AwsSecretsManager::connect(&config.aws.region, &config.aws.identity()).await;
//!
//! let orchestrator =
//!     PipelineOrchestrator::new(config, context, Arc::new(store), Arc::new(ProcessRunner::new()));
//! let report = orchestrator.run(Some("2024-03-05"), chrono::Utc::now()).await?;
//! println!("Transferred {}", report.partition);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod credentials;
pub mod date;
pub mod pipeline;
