//! Error types and utilities for the homework bot

use std::fmt;
use thiserror::Error;

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, HwbotError>;

/// What exactly was wrong with a review API response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseIssue {
    /// The top-level body is not a JSON object
    NotAnObject,
    /// The `homeworks` key is absent
    HomeworksMissing,
    /// The `homeworks` key is present but is not a list
    HomeworksNotAList,
    /// A homework record lacks a required string field
    MissingField(&'static str),
}

impl fmt::Display for ResponseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "response body is not a JSON object"),
            Self::HomeworksMissing => write!(f, "response has no `homeworks` key"),
            Self::HomeworksNotAList => write!(f, "`homeworks` is not a list"),
            Self::MissingField(field) => write!(f, "homework record has no `{field}` field"),
        }
    }
}

/// Coarse error classes used to pick a notification and a log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing or malformed configuration, fatal at startup
    Configuration,
    /// The review API could not be reached or answered with a non-OK status
    Transport,
    /// The review API answered with a body of the wrong shape
    Validation,
    /// A homework status outside the verdict table
    UnknownStatus,
    /// A chat message could not be delivered
    Delivery,
    /// Anything else, such as a message that failed to format
    Internal,
}

impl ErrorClass {
    /// Short name used as a structured log field
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::Validation => "validation",
            Self::UnknownStatus => "unknown_status",
            Self::Delivery => "delivery",
            Self::Internal => "internal",
        }
    }
}

/// Main error type for homework bot operations
#[derive(Error, Debug)]
pub enum HwbotError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network related errors (connection, timeout, unreadable body)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Review API answered with something other than 200 OK
    #[error("Practicum API error: {message}")]
    Practicum {
        message: String,
        status_code: Option<u16>,
    },

    /// Telegram Bot API related errors
    #[error("Telegram API error: {message}")]
    Telegram {
        message: String,
        error_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The review API body does not have the expected shape
    #[error("Invalid API response: {0}")]
    InvalidResponse(ResponseIssue),

    /// A homework status that has no verdict
    #[error("Undocumented homework status: {status}")]
    UnknownStatus { status: String },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl HwbotError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a review API error for a non-OK HTTP status
    pub fn practicum_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Practicum {
            message: msg.into(),
            status_code: Some(status),
        }
    }

    /// Create a new Telegram API error
    pub fn telegram(msg: impl Into<String>) -> Self {
        Self::Telegram {
            message: msg.into(),
            error_code: None,
            source: None,
        }
    }

    /// Create a new Telegram API error with error code
    pub fn telegram_with_code(msg: impl Into<String>, code: u16) -> Self {
        Self::Telegram {
            message: msg.into(),
            error_code: Some(code),
            source: None,
        }
    }

    /// Create a new Telegram API error with source
    pub fn telegram_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Telegram {
            message: msg.into(),
            error_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an unknown-status error
    pub fn unknown_status(status: impl Into<String>) -> Self {
        Self::UnknownStatus {
            status: status.into(),
        }
    }

    /// Classify the error
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Config { .. } => ErrorClass::Configuration,
            Self::Network { .. } | Self::Practicum { .. } => ErrorClass::Transport,
            Self::InvalidResponse(_) => ErrorClass::Validation,
            Self::UnknownStatus { .. } => ErrorClass::UnknownStatus,
            Self::Telegram { .. } => ErrorClass::Delivery,
            Self::Generic { .. } => ErrorClass::Internal,
        }
    }

    /// HTTP status code observed from a remote API, if any
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Practicum { status_code, .. } => *status_code,
            Self::Telegram { error_code, .. } => *error_code,
            _ => None,
        }
    }
}

/// Convert from reqwest::Error to HwbotError
impl From<reqwest::Error> for HwbotError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_decode() {
            Self::network_with_source("Failed to decode response body", err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

impl From<ResponseIssue> for HwbotError {
    fn from(issue: ResponseIssue) -> Self {
        Self::InvalidResponse(issue)
    }
}
