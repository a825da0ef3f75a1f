//! Configuration management for the transfer job.
//!
//! # Overview
//!
//! Configuration is assembled once at startup from, in increasing precedence:
//! - Built-in defaults
//! - An optional TOML file with `${VAR_NAME}` substitution
//! - Environment variables
//!
//! The process environment is passed in as a snapshot; nothing in this module
//! reads `std::env` directly.
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and runtime environment
//! - [`AwsConfig`] - Secret store region, entry name and identity
//! - [`GcpConfig`] - Export location, credential file and tool path
//! - [`SecretKeyNames`] - Key names to look up inside the secret bundle
//! - [`LoggingConfig`] - Optional rolling file logs
//!
//! # Example Configuration
//!
//! ```toml
//! [aws]
//! region = "ap-northeast-1"
//! secret_name = "ga4/bigquery-to-s3"
//!
//! [gcp]
//! region = "asia-northeast1"
//! credentials_path = "/tmp/credentials.json"
//!
//! [secret_keys]
//! dataset_id = "BIGQUERY_DATASET_ID"
//! base64_credentials = "GCP_CREDENTIALS_BASE64"
//! export_uri = "GCS_EXPORT_URI"
//! transfer_uri = "S3_TRANSFER_URI"
//! ```
//!
//! # Environment Variables
//!
//! The batch job definition sets `AWS_REGION`, `AWS_SECRETS_MANAGER_NAME`,
//! `GCS_REGION_NAME` and the four `AWS_SECRETS_MANAGER_*` key-name variables.
//! Local runs add `AWS_PROFILE_NAME`; inside a batch job `AWS_BATCH_JOB_ID`
//! switches the secret store session to the ambient identity.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AwsConfig, Environment, GcpConfig, Identity, LoggingConfig,
    SecretKeyNames, TransferConfig,
};
pub use secret::{secret_string, SecretString, SecretText};
