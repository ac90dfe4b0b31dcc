//! Error types for message catalogue operations

use thiserror::Error;

/// Errors that can occur while building or using the catalogue
#[derive(Error, Debug)]
pub enum I18nError {
    /// The language code names no bundled locale
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// Failed to parse a bundled Fluent resource
    #[error("Failed to parse Fluent resource for {locale}: {errors:?}")]
    FluentParseError { locale: String, errors: Vec<String> },

    /// Message not found in the bundle
    #[error("Message not found: {key}")]
    MessageNotFound { key: String },

    /// Failed to format a message
    #[error("Failed to format message '{key}': {errors:?}")]
    MessageFormatError { key: String, errors: Vec<String> },
}

/// Result type for catalogue operations
pub type I18nResult<T> = Result<T, I18nError>;
