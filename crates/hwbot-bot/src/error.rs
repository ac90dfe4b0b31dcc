//! Application-wide error types using thiserror.

use hwbot_common::HwbotError;
use hwbot_i18n::I18nError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Configuration, client construction or other common-crate error.
    #[error(transparent)]
    Common(#[from] HwbotError),

    /// Message catalogue could not be built.
    #[error("Localization error: {0}")]
    I18n(#[from] I18nError),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
