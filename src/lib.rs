// GA4 Transfer - BigQuery to S3 daily partition job
// Copyright (c) 2025 GA4 Transfer Contributors
// Licensed under the MIT License

//! # GA4 Transfer
//!
//! Batch job that moves one day of GA4 event data out of BigQuery, through a
//! GCS staging bucket, into an S3 bucket.
//!
//! ## Overview
//!
//! A run:
//! - **Resolves** the partition date (`--target-date` or two days ago in UTC+9)
//! - **Fetches** a JSON secret bundle from AWS Secrets Manager
//! - **Writes** the decoded GCP service-account document to disk
//! - **Invokes** `gcloud` and `bq` to authenticate, export the `events_<YYYYMMDD>`
//!   table as Snappy Parquet, and mirror the staging prefix into S3
//!
//! The first failing step ends the run; there are no retries.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Date resolution, credential handling, pipeline sequencing
//! - [`adapters`] - Secret store and external process seams
//! - [`domain`] - Error taxonomy and validated identifiers
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
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
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let env: HashMap<String, String> = std::env::vars().collect();
//!     let config = load_config(None, &env)?;
//!
//!     let context = ExecutionContext::new(&env, &config);
//!     let store = AwsSecretsManager::connect(&config.aws.region, &config.aws.identity()).await;
//!     let orchestrator = PipelineOrchestrator::new(
//!         config,
//!         context,
//!         Arc::new(store),
//!         Arc::new(ProcessRunner::new()),
//!     );
//!
//!     let report = orchestrator.run(None, chrono::Utc::now()).await?;
//!     println!("Transferred partition {}", report.partition);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::TransferError`]. Pipeline runs wrap it in
//! [`core::pipeline::PipelineFailure`], which records the stage that could
//! not be reached and maps to the process exit code:
//!
//! ```rust,no_run
//! use ga4_transfer::core::date::parse_target_date;
//! use ga4_transfer::domain::TransferError;
//!
//! let err = parse_target_date("2024/03/05").unwrap_err();
//! assert!(matches!(err, TransferError::InvalidDateFormat { .. }));
//! assert_eq!(err.exit_code(), 2);
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
