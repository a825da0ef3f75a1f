//! Domain models and types for the transfer job.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Validated identifiers** ([`PartitionKey`], [`DatasetId`], [`StorageUri`])
//! - **The secret bundle** ([`SecretBundle`]) fetched once per run
//! - **Error types** ([`TransferError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TransferError>`]:
//!
//! ```rust
//! use ga4_transfer::domain::{PartitionKey, Result, TransferError};
//!
//! fn parse(raw: &str) -> Result<PartitionKey> {
//!     raw.parse()
//!         .map_err(|_| TransferError::InvalidDateFormat { input: raw.to_string() })
//! }
//! ```

pub mod bundle;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use bundle::SecretBundle;
pub use errors::TransferError;
pub use ids::{DatasetId, PartitionKey, StorageScheme, StorageUri};
pub use result::Result;
