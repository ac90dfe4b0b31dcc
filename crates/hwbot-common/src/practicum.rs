//! Practicum review API client
//!
//! Talks to the `homework_statuses` endpoint: one authenticated GET per poll,
//! no retries (the poll loop is the only retry mechanism), and a shape check
//! on the returned JSON before anything downstream looks at it.

use crate::error::{HwbotError, ResponseIssue, Result};
use crate::types::Cursor;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Default review API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Configuration for the review API client
#[derive(Clone)]
pub struct PracticumClientConfig {
    /// Full URL of the `homework_statuses` endpoint
    pub endpoint: String,
    /// OAuth token sent as `Authorization: OAuth <token>`
    pub token: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl fmt::Debug for PracticumClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClientConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for PracticumClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

impl PracticumClientConfig {
    /// Create a new configuration with the token and the default endpoint
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    /// Point the client at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Review API client
#[derive(Debug, Clone)]
pub struct PracticumClient {
    client: Client,
    config: PracticumClientConfig,
}

impl PracticumClient {
    /// Create a new client with the given configuration
    pub fn new(config: PracticumClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HwbotError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self { client, config })
    }

    /// Endpoint this client polls
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Request homework statuses changed since `cursor`.
    ///
    /// Anything but `200 OK` is an error carrying the observed status code.
    /// The body is returned as raw JSON; use [`check_response`] before reading it.
    #[instrument(skip(self), fields(from_date = %cursor))]
    pub async fn get_api_answer(&self, cursor: Cursor) -> Result<Value> {
        debug!("Requesting homework statuses from {}", self.config.endpoint);

        let response = self
            .client
            .get(&self.config.endpoint)
            .header(header::AUTHORIZATION, format!("OAuth {}", self.config.token))
            .query(&[("from_date", cursor.as_secs())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(status = status.as_u16(), "Review API returned unexpected status");
            return Err(HwbotError::practicum_with_status(
                format!("Unexpected response status: {}", status.as_u16()),
                status.as_u16(),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| HwbotError::network_with_source("Failed to read response body", e))?;
        debug!("Response body: {}", text);

        let value = serde_json::from_str(&text).map_err(|e| {
            HwbotError::network_with_source("Review API returned a non-JSON body", e)
        })?;

        info!("Fetched homework statuses");
        Ok(value)
    }
}

/// Validated review API payload.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkBatch {
    /// Raw homework entries, newest first
    pub homeworks: Vec<Value>,
    /// Server time of the answer; `None` when absent or not an integer
    pub current_date: Option<i64>,
}

impl HomeworkBatch {
    /// Newest entry, if any
    pub fn newest(&self) -> Option<&Value> {
        self.homeworks.first()
    }

    /// True when nothing changed since the cursor
    pub fn is_empty(&self) -> bool {
        self.homeworks.is_empty()
    }
}

/// Check the shape of a review API body.
///
/// The body must be an object whose `homeworks` is a list. `current_date` is
/// read leniently; the caller decides what to do when it is missing.
pub fn check_response(response: Value) -> Result<HomeworkBatch> {
    let Value::Object(mut body) = response else {
        error!("Review API body is not an object");
        return Err(ResponseIssue::NotAnObject.into());
    };

    let homeworks = match body.remove("homeworks") {
        Some(Value::Array(list)) => list,
        Some(_) => {
            error!("`homeworks` is not a list");
            return Err(ResponseIssue::HomeworksNotAList.into());
        }
        None => {
            error!("`homeworks` key is missing from the response");
            return Err(ResponseIssue::HomeworksMissing.into());
        }
    };

    let current_date = body.get("current_date").and_then(Value::as_i64);

    Ok(HomeworkBatch {
        homeworks,
        current_date,
    })
}
