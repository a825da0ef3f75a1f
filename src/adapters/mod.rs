//! External system integrations for the transfer job.
//!
//! - [`secrets`] - Secret store access (AWS Secrets Manager)
//! - [`process`] - External tool execution (`gcloud`, `bq`)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the pipeline can be
//! exercised with fake implementations.
//!
//! ```rust,no_run
//! use ga4_transfer::adapters::secrets::{AwsSecretsManager, SecretStore};
//! use ga4_transfer::config::Identity;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = AwsSecretsManager::connect("ap-northeast-1", &Identity::Ambient).await;
//! let bundle = store.resolve("ga4/bigquery-to-s3").await?;
//! println!("{} keys", bundle.len());
//! # Ok(())
//! # }
//! ```

pub mod process;
pub mod secrets;
