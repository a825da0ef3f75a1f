//! Logging and observability
//!
//! Structured logging with:
//! - Human-readable console output
//! - Optional JSON lines in a rolling local file
//! - A `transfer` span carrying `run_id` and `partition` on every event
//!
//! # Example
//!
//! ```no_run
//! use ga4_transfer::logging::init_logging;
//! use ga4_transfer::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a pipeline stage transition
///
/// # Example
///
/// ```no_run
/// use ga4_transfer::log_stage_reached;
/// use ga4_transfer::core::pipeline::PipelineStage;
///
/// log_stage_reached!(PipelineStage::Exported);
/// ```
#[macro_export]
macro_rules! log_stage_reached {
    ($stage:expr) => {
        tracing::info!(stage = %$stage, "Stage reached");
    };
}

/// Log a failed external command with both output streams
///
/// # Example
///
/// ```no_run
/// use ga4_transfer::log_command_failure;
///
/// let stdout = String::new();
/// let stderr = String::from("ERROR: (gcloud) Invalid project");
/// log_command_failure!("gcloud config set project p", Some(1), &stdout, &stderr);
/// ```
#[macro_export]
macro_rules! log_command_failure {
    ($command:expr, $exit_status:expr, $stdout:expr, $stderr:expr) => {
        tracing::error!(
            command = %$command,
            exit_status = ?$exit_status,
            stdout = %$stdout,
            stderr = %$stderr,
            "External command failed"
        );
    };
}
