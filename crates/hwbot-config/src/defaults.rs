//! Default values for every configuration section.

use crate::schema::*;
use hwbot_common::practicum::DEFAULT_ENDPOINT;
use hwbot_common::LoggingConfig;

/// Pause between two polls.
pub const DEFAULT_INTERVAL_SECS: u64 = 600;

/// Timeout applied to both HTTP clients.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Language of the chat messages.
pub const DEFAULT_LANGUAGE: &str = "ru-RU";

impl Default for Config {
    fn default() -> Self {
        Self {
            practicum: PracticumConfig::default(),
            telegram: TelegramConfig::default(),
            polling: PollingConfig::default(),
            logging: LoggingConfig::default(),
            i18n: I18nConfig::default(),
        }
    }
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_id: None,
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            initial_cursor: None,
            cursor_source: CursorSource::Server,
            process: ProcessMode::Newest,
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}
