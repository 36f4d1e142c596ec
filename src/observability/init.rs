//! Tracing initialization and subscriber setup.
//!
//! This module configures the global `tracing` subscriber: an `EnvFilter`
//! for level selection and a `fmt` layer writing either to a rotating log
//! file or to stderr.

use super::file_writer::RotatingFileWriter;
use crate::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file created inside the configured data directory.
pub const LOG_FILE_NAME: &str = "bankflow.log";

/// Where [`init_tracing`] sent the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// The rotating log file at this path.
    File(std::path::PathBuf),
    Stderr,
    /// Nothing was installed: the data directory could not be created, or a
    /// global subscriber already existed.
    Disabled,
}

/// Initializes the global tracing subscriber.
///
/// # Trace Level Resolution
///
/// 1. `RUST_LOG` environment variable (highest priority)
/// 2. `config.trace_level`
/// 3. Default: `"info"`
///
/// # File Location
///
/// With `config.data_dir` set, logs go to `<data_dir>/bankflow.log`, rotated
/// at 10 MB with 3 backups. Without it, logs go to stderr.
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently gives up if directory creation fails (logging is optional)
/// - Idempotent: only the first successful call installs a subscriber
///
/// # Example
///
/// ```rust
/// use bankflow::observability::init_tracing;
/// use bankflow::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> LogTarget {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(data_dir) = config.data_dir.as_ref() else {
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .is_ok();
        return if installed { LogTarget::Stderr } else { LogTarget::Disabled };
    };

    if std::fs::create_dir_all(data_dir).is_err() {
        return LogTarget::Disabled;
    }

    let log_file = data_dir.join(LOG_FILE_NAME);
    let writer = RotatingFileWriter::new(log_file.clone());
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(path = ?log_file, "file logging initialized");
        LogTarget::File(log_file)
    } else {
        LogTarget::Disabled
    }
}
