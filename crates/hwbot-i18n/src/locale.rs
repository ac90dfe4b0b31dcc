//! Supported locales

use crate::error::{I18nError, I18nResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// Locales with a bundled message file
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Locale {
    /// `ru-RU`, the language of the review service
    #[default]
    Russian,
    /// `en-US`
    English,
}

impl Locale {
    /// Get the language code for this locale
    pub const fn code(self) -> &'static str {
        match self {
            Self::Russian => "ru-RU",
            Self::English => "en-US",
        }
    }

    /// Parse a locale from a language code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "ru" | "ru-RU" | "ru_RU" => Some(Self::Russian),
            "en" | "en-US" | "en_US" => Some(Self::English),
            _ => None,
        }
    }

    /// Convert to Fluent LanguageIdentifier
    pub fn to_language_identifier(self) -> I18nResult<LanguageIdentifier> {
        self.code()
            .parse()
            .map_err(|_| I18nError::InvalidLanguageId(self.code().to_string()))
    }

    /// Get all supported locales
    pub const fn all() -> [Self; 2] {
        [Self::Russian, Self::English]
    }

    /// Bundled Fluent source for this locale
    pub(crate) const fn source(self) -> &'static str {
        match self {
            Self::Russian => include_str!("../locales/ru-RU/main.ftl"),
            Self::English => include_str!("../locales/en-US/main.ftl"),
        }
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> I18nResult<Self> {
        Self::from_code(s).ok_or_else(|| I18nError::UnsupportedLanguage(s.to_string()))
    }
}
