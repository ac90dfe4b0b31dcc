//! Configuration loading: defaults, then an optional file, then `.env`, then
//! the process environment.

use crate::schema::{Config, CursorSource, ProcessMode};
use hwbot_common::{ChatId, HwbotError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Review API OAuth token.
pub const ENV_PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
/// Telegram bot token.
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
/// Telegram chat receiving notifications.
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
/// Path of an optional YAML or TOML configuration file.
pub const ENV_CONFIG_PATH: &str = "HWBOT_CONFIG";

const ENV_PRACTICUM_ENDPOINT: &str = "HWBOT_PRACTICUM_ENDPOINT";
const ENV_TELEGRAM_API_URL: &str = "HWBOT_TELEGRAM_API_URL";
const ENV_POLL_INTERVAL: &str = "HWBOT_POLL_INTERVAL_SECS";
const ENV_INITIAL_CURSOR: &str = "HWBOT_INITIAL_CURSOR";
const ENV_CURSOR_SOURCE: &str = "HWBOT_CURSOR_SOURCE";
const ENV_PROCESS: &str = "HWBOT_PROCESS";
const ENV_LOG_LEVEL: &str = "HWBOT_LOG_LEVEL";
const ENV_LOG_DIR: &str = "HWBOT_LOG_DIR";
const ENV_LOG_MAX_FILE_SIZE: &str = "HWBOT_LOG_MAX_FILE_SIZE_MB";
const ENV_LOG_MAX_FILES: &str = "HWBOT_LOG_MAX_FILES";
const ENV_LANGUAGE: &str = "HWBOT_LANGUAGE";

/// Configuration loader.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    dotenv: bool,
}

impl ConfigLoader {
    /// Creates a loader reading only the environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader that takes the file path from `HWBOT_CONFIG` and reads `.env`.
    pub fn from_env() -> Self {
        let path = std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from);
        Self { path, dotenv: true }
    }

    /// Also read the given configuration file.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Load a `.env` file from the working directory before reading the environment.
    pub fn with_dotenv(mut self, enabled: bool) -> Self {
        self.dotenv = enabled;
        self
    }

    /// Loads the configuration from the process environment.
    ///
    /// The result is not validated; call [`Config::validate`] before use.
    pub fn load(&self) -> Result<Config> {
        if self.dotenv {
            match dotenvy::dotenv() {
                Ok(path) => debug!("Loaded environment from {}", path.display()),
                Err(e) if e.not_found() => debug!("No .env file found"),
                Err(e) => warn!("Ignoring unreadable .env file: {}", e),
            }
        }
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Loads the configuration reading variables through `lookup`.
    pub fn load_with<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.path {
            Some(path) => load_file(path)?,
            None => Config::default(),
        };
        apply_env_overrides(&mut config, lookup)?;
        Ok(config)
    }
}

/// Parses a configuration file, picking the format from its extension.
pub fn load_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        HwbotError::config_with_source(format!("Failed to read {}", path.display()), e)
    })?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|e| {
            HwbotError::config_with_source(format!("Invalid YAML in {}", path.display()), e)
        })?,
        Some("toml") => toml::from_str(&content).map_err(|e| {
            HwbotError::config_with_source(format!("Invalid TOML in {}", path.display()), e)
        })?,
        _ => {
            return Err(HwbotError::config(format!(
                "Unsupported configuration file format: {} (expected .yaml, .yml or .toml)",
                path.display()
            )))
        }
    };

    info!("Loaded configuration file {}", path.display());
    Ok(config)
}

/// Overlays environment variables on top of `config`. Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(token) = var(ENV_PRACTICUM_TOKEN) {
        config.practicum.token = token;
    }
    if let Some(token) = var(ENV_TELEGRAM_TOKEN) {
        config.telegram.token = token;
    }
    if let Some(chat_id) = var(ENV_TELEGRAM_CHAT_ID) {
        config.telegram.chat_id = Some(chat_id.parse::<ChatId>()?);
    }
    if let Some(endpoint) = var(ENV_PRACTICUM_ENDPOINT) {
        config.practicum.endpoint = endpoint;
    }
    if let Some(api_url) = var(ENV_TELEGRAM_API_URL) {
        config.telegram.api_url = api_url;
    }
    if let Some(interval) = var(ENV_POLL_INTERVAL) {
        config.polling.interval_secs = parse_number(ENV_POLL_INTERVAL, &interval)?;
    }
    if let Some(cursor) = var(ENV_INITIAL_CURSOR) {
        config.polling.initial_cursor = if cursor.eq_ignore_ascii_case("now") {
            None
        } else {
            Some(parse_number(ENV_INITIAL_CURSOR, &cursor)?)
        };
    }
    if let Some(source) = var(ENV_CURSOR_SOURCE) {
        config.polling.cursor_source = match source.as_str() {
            "server" => CursorSource::Server,
            "local_clock" => CursorSource::LocalClock,
            other => return Err(invalid_choice(ENV_CURSOR_SOURCE, other, "server, local_clock")),
        };
    }
    if let Some(process) = var(ENV_PROCESS) {
        config.polling.process = match process.as_str() {
            "newest" => ProcessMode::Newest,
            "all" => ProcessMode::All,
            other => return Err(invalid_choice(ENV_PROCESS, other, "newest, all")),
        };
    }
    if let Some(level) = var(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    if let Some(dir) = var(ENV_LOG_DIR) {
        config.logging.directory = Some(PathBuf::from(dir));
    }
    if let Some(size) = var(ENV_LOG_MAX_FILE_SIZE) {
        config.logging.max_file_size_mb = parse_number(ENV_LOG_MAX_FILE_SIZE, &size)?;
    }
    if let Some(count) = var(ENV_LOG_MAX_FILES) {
        config.logging.max_files = parse_number(ENV_LOG_MAX_FILES, &count)?;
    }
    if let Some(language) = var(ENV_LANGUAGE) {
        config.i18n.language = language;
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| HwbotError::config_with_source(format!("{key} must be a number, got '{value}'"), e))
}

fn invalid_choice(key: &str, value: &str, expected: &str) -> HwbotError {
    HwbotError::config(format!("{key} must be one of {expected}, got '{value}'"))
}
