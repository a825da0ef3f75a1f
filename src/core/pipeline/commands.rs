//! External tool command builders
//!
//! Each builder takes validated domain values and produces a program plus an
//! argument vector. Commands are executed without a shell, so values never
//! pass through shell parsing; [`ToolCommand`]'s `Display` output is for logs.

use crate::domain::{DatasetId, PartitionKey, StorageUri};
use std::fmt;
use std::path::Path;

/// Export object format
pub const EXPORT_FORMAT: &str = "PARQUET";

/// Export compression codec
pub const EXPORT_COMPRESSION: &str = "SNAPPY";

/// Object name pattern for exported shards
pub const EXPORT_OBJECT_PATTERN: &str = "export-*.parquet";

/// A single external tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Creates a command for `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program name, resolved against the context's `PATH`
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument vector
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '\'') {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// `gcloud config set project <project>`
pub fn set_project(dataset: &DatasetId) -> ToolCommand {
    ToolCommand::new("gcloud")
        .arg("config")
        .arg("set")
        .arg("project")
        .arg(dataset.project_id())
}

/// `gcloud auth activate-service-account --key-file=<path>`
pub fn activate_service_account(key_file: &Path) -> ToolCommand {
    ToolCommand::new("gcloud")
        .arg("auth")
        .arg("activate-service-account")
        .arg(format!("--key-file={}", key_file.display()))
}

/// Staging location of one partition's export shards
pub fn export_destination(staging_root: &StorageUri, partition: &PartitionKey) -> StorageUri {
    staging_root
        .join(&format!("event_date_part={partition}"))
        .join(EXPORT_OBJECT_PATTERN)
}

/// `bq extract` of one day's event table into the staging bucket
pub fn extract_partition(
    location: &str,
    dataset: &DatasetId,
    partition: &PartitionKey,
    staging_root: &StorageUri,
) -> ToolCommand {
    ToolCommand::new("bq")
        .arg("extract")
        .arg(format!("--location={location}"))
        .arg(format!("--destination_format={EXPORT_FORMAT}"))
        .arg(format!("--compression={EXPORT_COMPRESSION}"))
        .arg("--print_header=true")
        .arg(dataset.events_table(partition))
        .arg(export_destination(staging_root, partition).as_str())
}

/// `gcloud storage rsync <staging> <durable> --recursive`
pub fn sync_to_durable(staging_root: &StorageUri, durable_root: &StorageUri) -> ToolCommand {
    ToolCommand::new("gcloud")
        .arg("storage")
        .arg("rsync")
        .arg(staging_root.as_str())
        .arg(durable_root.as_str())
        .arg("--recursive")
}
