//! Configuration schema definitions using serde.

use hwbot_common::{ChatId, LoggingConfig, PracticumClientConfig, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main configuration structure for the homework bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Review API configuration.
    pub practicum: PracticumConfig,
    /// Telegram configuration.
    pub telegram: TelegramConfig,
    /// Poll loop configuration.
    pub polling: PollingConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Localization configuration.
    pub i18n: I18nConfig,
}

/// Review API configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticumConfig {
    /// OAuth token (`PRACTICUM_TOKEN`).
    pub token: String,
    /// `homework_statuses` endpoint URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Telegram bot configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token (`TELEGRAM_TOKEN`).
    pub token: String,
    /// Chat receiving the notifications (`TELEGRAM_CHAT_ID`).
    pub chat_id: Option<ChatId>,
    /// Bot API base URL.
    pub api_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Where the cursor comes from after a successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorSource {
    /// The `current_date` field of the API answer.
    Server,
    /// The local clock at the end of the iteration.
    LocalClock,
}

/// Which homework entries of one answer get a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessMode {
    /// Only the first (newest) entry.
    Newest,
    /// Every entry, in the order the API returned them.
    All,
}

/// Poll loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Fixed pause between two polls, in seconds.
    pub interval_secs: u64,
    /// Cursor for the first poll; the current time when unset.
    pub initial_cursor: Option<i64>,
    /// How the cursor advances.
    pub cursor_source: CursorSource,
    /// Which entries are notified.
    pub process: ProcessMode,
}

/// Localization configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Language of the chat messages.
    pub language: String,
}

impl fmt::Debug for PracticumConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumConfig")
            .field("token", &redacted(&self.token))
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &redacted(&self.token))
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        crate::validator::ConfigValidator::validate(self)
    }

    /// Names of the required credentials that are missing or blank.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.practicum.token.trim().is_empty() {
            missing.push(crate::loader::ENV_PRACTICUM_TOKEN);
        }
        if self.telegram.token.trim().is_empty() {
            missing.push(crate::loader::ENV_TELEGRAM_TOKEN);
        }
        if self.telegram.chat_id.is_none() {
            missing.push(crate::loader::ENV_TELEGRAM_CHAT_ID);
        }
        missing
    }

    /// Review API client settings.
    pub fn practicum_client_config(&self) -> PracticumClientConfig {
        PracticumClientConfig::new(self.practicum.token.clone())
            .with_endpoint(self.practicum.endpoint.clone())
            .with_timeout(self.practicum.timeout_secs)
    }
}
