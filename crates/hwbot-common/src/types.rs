//! Common type definitions and newtype wrappers for domain modeling.

use crate::error::{HwbotError, ResponseIssue, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Lower bound (epoch seconds) sent as `from_date` on the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub i64);

impl Cursor {
    /// The epoch, asks the API for every homework ever reviewed.
    pub const EPOCH: Self = Self(0);

    /// Epoch seconds.
    pub const fn as_secs(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Telegram chat identifier: numeric id or `@channelusername`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    /// Numeric chat id (negative for groups)
    Id(i64),
    /// Public channel username including the leading `@`
    Username(String),
}

impl FromStr for ChatId {
    type Err = HwbotError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self::Id(id));
        }
        if s.len() > 1 && s.starts_with('@') {
            return Ok(Self::Username(s.to_string()));
        }
        Err(HwbotError::config(format!(
            "Invalid Telegram chat id '{s}': expected an integer or @channelusername"
        )))
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

/// Review statuses that have a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    /// Reviewed, accepted
    Approved,
    /// Taken for review
    Reviewing,
    /// Reviewed, sent back with remarks
    Rejected,
}

impl HomeworkStatus {
    /// Wire name used by the review API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// All statuses with a verdict.
    pub const fn all() -> [Self; 3] {
        [Self::Approved, Self::Reviewing, Self::Rejected]
    }
}

impl FromStr for HomeworkStatus {
    type Err = HwbotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(HwbotError::unknown_status(other)),
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the API's `homeworks` list.
///
/// The API sends more fields (`id`, `lesson_name`, `reviewer_comment`,
/// `date_updated`); only the two that go into a notification are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeworkRecord {
    /// Name of the submitted work
    pub homework_name: String,
    /// Raw status string as sent by the API
    pub status: String,
}

impl HomeworkRecord {
    /// Extract a record from a raw JSON entry.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            homework_name: string_field(value, "homework_name")?,
            status: string_field(value, "status")?,
        })
    }

    /// Parse the raw status against the verdict table.
    pub fn parsed_status(&self) -> Result<HomeworkStatus> {
        self.status.parse()
    }
}

fn string_field(value: &Value, field: &'static str) -> Result<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(HwbotError::InvalidResponse(ResponseIssue::MissingField(field)))
}
