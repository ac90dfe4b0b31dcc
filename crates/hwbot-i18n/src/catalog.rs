//! Message catalogue: verdicts, status-change notifications and failure texts.

use crate::error::{I18nError, I18nResult};
use crate::locale::Locale;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use hwbot_common::{HomeworkStatus, HwbotError, ResponseIssue};
use std::error::Error as _;
use std::fmt;
use tracing::{debug, error};

/// Formats every text the bot sends to the chat.
pub struct Catalog {
    locale: Locale,
    bundle: FluentBundle<FluentResource>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Builds the catalogue for a bundled locale.
    pub fn new(locale: Locale) -> I18nResult<Self> {
        let resource = FluentResource::try_new(locale.source().to_string()).map_err(|(_, errors)| {
            let errors: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
            error!("Failed to parse Fluent resource: {:?}", errors);
            I18nError::FluentParseError {
                locale: locale.code().to_string(),
                errors,
            }
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale.to_language_identifier()?]);
        // Output must be byte-exact; no FSI/PDI marks around placeables.
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| I18nError::FluentParseError {
            locale: locale.code().to_string(),
            errors: errors.into_iter().map(|e| format!("{e:?}")).collect(),
        })?;

        debug!("Loaded message catalogue for {}", locale.code());
        Ok(Self { locale, bundle })
    }

    /// Builds the catalogue for a language code such as `ru-RU`.
    pub fn for_language(code: &str) -> I18nResult<Self> {
        Self::new(code.parse()?)
    }

    /// Locale of this catalogue.
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// The fixed verdict sentence for a status.
    pub fn verdict(&self, status: HomeworkStatus) -> I18nResult<String> {
        let key = match status {
            HomeworkStatus::Approved => "verdict-approved",
            HomeworkStatus::Reviewing => "verdict-reviewing",
            HomeworkStatus::Rejected => "verdict-rejected",
        };
        self.format(key, None)
    }

    /// Notification for a homework whose review status changed.
    pub fn status_changed(&self, homework_name: &str, status: HomeworkStatus) -> I18nResult<String> {
        let verdict = self.verdict(status)?;
        let mut args = FluentArgs::new();
        args.set("name", homework_name.to_string());
        args.set("verdict", verdict);
        self.format("status-changed", Some(&args))
    }

    /// Notification for a failed poll iteration.
    pub fn failure(&self, err: &HwbotError) -> I18nResult<String> {
        let mut args = FluentArgs::new();
        args.set("reason", self.failure_reason(err)?);
        self.format("program-failure", Some(&args))
    }

    fn failure_reason(&self, err: &HwbotError) -> I18nResult<String> {
        let mut args = FluentArgs::new();
        let key = match err {
            HwbotError::Practicum {
                status_code: Some(code),
                ..
            } => {
                args.set("code", code.to_string());
                "reason-unexpected-status"
            }
            HwbotError::Network { .. } | HwbotError::Practicum { .. } => {
                args.set("details", describe_chain(err));
                "reason-request-failed"
            }
            HwbotError::InvalidResponse(ResponseIssue::NotAnObject) => "reason-not-an-object",
            HwbotError::InvalidResponse(ResponseIssue::HomeworksMissing) => "reason-homeworks-missing",
            HwbotError::InvalidResponse(ResponseIssue::HomeworksNotAList) => {
                "reason-homeworks-not-a-list"
            }
            HwbotError::InvalidResponse(ResponseIssue::MissingField(field)) => {
                args.set("field", *field);
                "reason-missing-field"
            }
            HwbotError::UnknownStatus { status } => {
                args.set("status", status.clone());
                "reason-unknown-status"
            }
            HwbotError::Config { .. } | HwbotError::Telegram { .. } | HwbotError::Generic { .. } => {
                args.set("details", describe_chain(err));
                "reason-internal"
            }
        };
        self.format(key, Some(&args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> I18nResult<String> {
        let pattern = self
            .bundle
            .get_message(key)
            .and_then(|message| message.value())
            .ok_or_else(|| I18nError::MessageNotFound {
                key: key.to_string(),
            })?;

        let mut errors = Vec::new();
        let text = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            return Err(I18nError::MessageFormatError {
                key: key.to_string(),
                errors: errors.iter().map(|e| format!("{e:?}")).collect(),
            });
        }
        Ok(text.into_owned())
    }
}

/// `err` followed by each of its sources, separated by `: `.
fn describe_chain(err: &HwbotError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
