//! Subscriber setup
//!
//! Console output is always on. With file logging enabled, a second layer
//! writes JSON lines, including the active `transfer` span, to a rolling
//! file under the configured directory.

use crate::config::LoggingConfig;
use crate::domain::{Result, TransferError};
use std::path::Path;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "ga4-transfer.log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Keeps the background file writer alive; dropping it flushes pending lines
pub struct LoggingGuard {
    _writer: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// `RUST_LOG`, when set, replaces the `ga4_transfer=<level>` directive.
///
/// # Errors
///
/// [`TransferError::Configuration`] for an unknown level, an unwritable log
/// directory, or a second call in the same process.
///
/// # Example
///
/// ```no_run
/// use ga4_transfer::logging::init_logging;
/// use ga4_transfer::config::LoggingConfig;
///
/// let _guard = init_logging("info", &LoggingConfig::default()).expect("logging");
/// tracing::info!("ready");
/// ```
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_level(level)?;
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("ga4_transfer={level}")))
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter())
        .boxed();

    let (file, writer) = if config.local_enabled {
        let (layer, guard) = json_file_layer(config)?;
        (Some(layer.with_filter(filter()).boxed()), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| TransferError::Configuration(format!("Logger already installed: {e}")))?;

    tracing::debug!(
        level = %level,
        file_logging = config.local_enabled,
        directory = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard { _writer: writer })
}

fn json_file_layer<S>(config: &LoggingConfig) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync + 'static,
{
    let directory = Path::new(&config.local_path);
    std::fs::create_dir_all(directory).map_err(|e| {
        TransferError::Configuration(format!(
            "Cannot create log directory {}: {e}",
            directory.display()
        ))
    })?;

    let appender = RollingFileAppender::new(
        rotation(&config.local_rotation),
        directory,
        LOG_FILE_PREFIX,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(writer)
        .boxed();

    Ok((layer, guard))
}

fn parse_level(level: &str) -> Result<Level> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => level
            .parse::<Level>()
            .map_err(|e| TransferError::Configuration(e.to_string())),
        _ => Err(TransferError::Configuration(format!(
            "Unknown log level '{level}' (expected trace, debug, info, warn or error)"
        ))),
    }
}

fn rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}
