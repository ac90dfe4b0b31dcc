//! Structured logging infrastructure for the homework bot

use crate::error::{HwbotError, Result};
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directory of the log files unless configured otherwise.
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

const BYTES_PER_MB: usize = 1024 * 1024;

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "hwbot_bot=trace")
    pub level: String,
    /// Directory for the log files; console only when explicitly unset
    pub directory: Option<PathBuf>,
    /// File name prefix; the active file is `<prefix>.log`
    pub file_prefix: String,
    /// Size in megabytes after which the active file is rotated
    pub max_file_size_mb: u64,
    /// How many rotated files to keep (`<prefix>.log.1` is the newest)
    pub max_files: usize,
    /// Whether to colour console output
    pub ansi: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: Some(PathBuf::from(DEFAULT_LOG_DIRECTORY)),
            file_prefix: "homework-bot".to_string(),
            max_file_size_mb: 50,
            max_files: 5,
            ansi: true,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Path of the active log file inside `directory`.
    pub fn file_path(&self, directory: &Path) -> PathBuf {
        directory.join(format!("{}.log", self.file_prefix))
    }
}

/// Opens the size-capped, append-only log file under `directory`.
///
/// The active file rolls over once a write takes it past `max_file_size_mb`
/// and at most `max_files` rotated files are kept, which caps disk use at
/// about `(max_files + 1) * max_file_size_mb`.
pub fn log_file_writer(config: &LoggingConfig, directory: &Path) -> Result<FileRotate<AppendCount>> {
    std::fs::create_dir_all(directory).map_err(|e| {
        HwbotError::config_with_source(
            format!("Failed to create log directory {}", directory.display()),
            e,
        )
    })?;

    let max_bytes = usize::try_from(config.max_file_size_mb.max(1))
        .unwrap_or(usize::MAX)
        .saturating_mul(BYTES_PER_MB);

    Ok(FileRotate::new(
        config.file_path(directory),
        AppendCount::new(config.max_files.max(1)),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` wins over `config.level`. When a log directory is configured
/// the returned guard must be held until shutdown, otherwise buffered lines
/// are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| HwbotError::config_with_source("Invalid log level filter", e))?;

    let console_layer = fmt::layer()
        .with_ansi(config.ansi)
        .with_target(config.include_targets);

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let (writer, guard) = tracing_appender::non_blocking(log_file_writer(config, directory)?);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(config.include_targets)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| HwbotError::config_with_source("Failed to install tracing subscriber", e))?;

    Ok(guard)
}

/// Initialize console-only logging with otherwise default configuration
pub fn init_default_logging() -> Result<()> {
    let config = LoggingConfig {
        directory: None,
        ..LoggingConfig::default()
    };
    init_logging(&config).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.directory, Some(PathBuf::from("logs")));
        assert_eq!(config.file_prefix, "homework-bot");
        assert_eq!(config.max_file_size_mb, 50);
        assert_eq!(config.max_files, 5);
        assert!(config.include_targets);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: LoggingConfig = serde_json::from_str(r#"{"level": "debug"}"#).unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.max_files, 5);
        assert!(config.directory.is_some());

        let config: LoggingConfig = serde_json::from_str(r#"{"directory": null}"#).unwrap();
        assert!(config.directory.is_none());
    }

    #[test]
    fn test_log_file_rotates_by_size() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");
        let config = LoggingConfig {
            max_file_size_mb: 1,
            max_files: 2,
            ..LoggingConfig::default()
        };

        let mut writer = log_file_writer(&config, &logs).unwrap();
        let chunk = vec![b'x'; 600 * 1024];
        for _ in 0..8 {
            writer.write_all(&chunk).unwrap();
        }
        writer.write_all(b"tail\n").unwrap();
        writer.flush().unwrap();

        let active = config.file_path(&logs);
        assert!(active.exists());
        assert!(logs.join("homework-bot.log.1").exists());
        assert!(logs.join("homework-bot.log.2").exists());
        assert!(!logs.join("homework-bot.log.3").exists());
        for path in [active, logs.join("homework-bot.log.1")] {
            let size = std::fs::metadata(path).unwrap().len();
            assert!(size <= 2 * 1024 * 1024, "{size}");
        }
    }
}
