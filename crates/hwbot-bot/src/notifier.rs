//! Outbound chat messages.

use async_trait::async_trait;
use hwbot_common::Result;
use tracing::{error, info};

/// Sends one text message to the configured chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send `text`. One attempt, no retry.
    async fn send_message(&self, text: &str) -> Result<()>;
}

/// Best-effort delivery: failures are logged and swallowed.
///
/// Returns whether the message went out.
pub async fn deliver<M>(sink: &M, text: &str) -> bool
where
    M: MessageSink + ?Sized,
{
    match sink.send_message(text).await {
        Ok(()) => {
            info!("Message sent: {}", text);
            true
        }
        Err(e) => {
            error!(error = %e, error_class = e.class().as_str(), "Failed to send message");
            false
        }
    }
}
