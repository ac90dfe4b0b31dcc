//! Telegram Bot API client.
//!
//! Only `sendMessage` is used: one POST per notification, no retries. The bot
//! token is part of the request URL, so transport errors are stripped of
//! their URL before they reach a log line.

use crate::notifier::MessageSink;
use async_trait::async_trait;
use hwbot_common::{truncate_utf16, ChatId, HwbotError, Result, TELEGRAM_MESSAGE_LIMIT};
use hwbot_config::TelegramConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
}

/// Envelope of every Bot API reply.
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
    error_code: Option<u16>,
}

/// Sends notifications to one Telegram chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    token: String,
    chat_id: ChatId,
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Create a notifier posting to `chat_id` through the Bot API at `api_url`.
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: ChatId,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HwbotError::telegram_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id,
        })
    }

    /// Build from a validated configuration section.
    pub fn from_config(config: &TelegramConfig) -> Result<Self> {
        let chat_id = config
            .chat_id
            .clone()
            .ok_or_else(|| HwbotError::config("Telegram chat id is not configured"))?;
        Self::new(
            config.api_url.clone(),
            config.token.clone(),
            chat_id,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Chat receiving the messages.
    pub const fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_url, self.token)
    }
}

#[async_trait]
impl MessageSink for TelegramNotifier {
    #[instrument(skip(self, text), fields(chat_id = %self.chat_id))]
    async fn send_message(&self, text: &str) -> Result<()> {
        let text = truncate_utf16(text, TELEGRAM_MESSAGE_LIMIT);
        debug!("Sending message: {}", text);

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text: &text,
            })
            .send()
            .await
            .map_err(|e| HwbotError::telegram_with_source("Request to Bot API failed", e.without_url()))?;

        let status = response.status();
        let reply: TelegramResponse = response.json().await.map_err(|e| {
            HwbotError::telegram_with_source(
                format!("Unreadable Bot API reply (HTTP {})", status.as_u16()),
                e.without_url(),
            )
        })?;

        if reply.ok {
            return Ok(());
        }

        let description = reply
            .description
            .unwrap_or_else(|| "no description".to_string());
        let code = reply.error_code.unwrap_or_else(|| status.as_u16());
        warn!(error_code = code, "Bot API rejected the message: {}", description);
        Err(HwbotError::telegram_with_code(description, code))
    }
}
