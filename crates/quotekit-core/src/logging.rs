//! Console and rolling-file subscriber for binaries embedding the client.
//!
//! The library itself only emits `tracing` events; call [`init_logging`]
//! once from the composition root and keep the returned guard alive.

use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::Settings;
use crate::ConfigError;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("failed to create log file appender in '{dir}': {message}")]
    Appender { dir: String, message: String },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `debug` or `quotekit_core=info`.
    pub level: String,
    /// Directory for rolling log files; console only when `None`.
    pub dir: Option<PathBuf>,
    pub file_prefix: String,
    /// Rotated files kept on disk.
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("debug"),
            dir: None,
            file_prefix: String::from("quotekit"),
            max_files: 5,
        }
    }
}

impl LoggingConfig {
    /// Reads `logging.level`, `logging.dir`, `logging.file_prefix` and
    /// `logging.max_files`.
    pub fn from_settings(settings: &Settings) -> Result<Self, LoggingError> {
        let defaults = Self::default();
        let max_files = match settings.get_u64("logging.max_files")? {
            Some(count) => usize::try_from(count).unwrap_or(usize::MAX),
            None => defaults.max_files,
        };

        Ok(Self {
            level: settings.get_string_or("logging.level", &defaults.level),
            dir: settings.get_string("logging.dir").map(PathBuf::from),
            file_prefix: settings.get_string_or("logging.file_prefix", &defaults.file_prefix),
            max_files,
        })
    }
}

/// Installs the global subscriber. Returns the file writer guard when file
/// logging is enabled; dropping it flushes and stops the writer.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter =
        EnvFilter::try_new(&config.level).map_err(|error| LoggingError::InvalidFilter {
            filter: config.level.clone(),
            message: error.to_string(),
        })?;

    let console = fmt::layer().with_target(true).with_writer(std::io::stdout);

    let (file, guard) = match &config.dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix("log")
                .max_log_files(config.max_files.max(1))
                .build(dir)
                .map_err(|error| LoggingError::Appender {
                    dir: dir.display().to_string(),
                    message: error.to_string(),
                })?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::debug!(level = %config.level, file_logging = guard.is_some(), "logging initialized");
    Ok(guard)
}
