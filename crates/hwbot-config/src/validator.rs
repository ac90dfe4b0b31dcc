//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use hwbot_common::{ChatId, HwbotError, Result};
use url::Url;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    ///
    /// Missing credentials are reported together so one restart fixes them all.
    pub fn validate(config: &Config) -> Result<()> {
        let missing = config.missing_credentials();
        if !missing.is_empty() {
            return Err(HwbotError::config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        if let Some(ChatId::Username(name)) = &config.telegram.chat_id {
            if !name.starts_with('@') || name.len() < 2 {
                return Err(HwbotError::config(format!(
                    "Telegram chat id '{name}' must be numeric or start with '@'"
                )));
            }
        }

        Self::validate_url("practicum.endpoint", &config.practicum.endpoint)?;
        Self::validate_url("telegram.api_url", &config.telegram.api_url)?;

        if config.polling.interval_secs == 0 {
            return Err(HwbotError::config("polling.interval_secs must be greater than 0"));
        }
        if config.practicum.timeout_secs == 0 || config.telegram.timeout_secs == 0 {
            return Err(HwbotError::config("HTTP timeouts must be greater than 0"));
        }
        if config.polling.initial_cursor.is_some_and(|cursor| cursor < 0) {
            return Err(HwbotError::config("polling.initial_cursor cannot be negative"));
        }
        if config.logging.max_file_size_mb == 0 || config.logging.max_files == 0 {
            return Err(HwbotError::config(
                "logging.max_file_size_mb and logging.max_files must be greater than 0",
            ));
        }
        if config.i18n.language.trim().is_empty() {
            return Err(HwbotError::config("i18n.language cannot be empty"));
        }

        Ok(())
    }

    fn validate_url(field: &str, value: &str) -> Result<()> {
        let url = Url::parse(value)
            .map_err(|e| HwbotError::config_with_source(format!("{field} is not a valid URL"), e))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(HwbotError::config(format!(
                "{field} must use http or https, not {scheme}"
            ))),
        }
    }
}
