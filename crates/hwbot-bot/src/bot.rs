//! Wiring of the configured clients into a running poller.

use crate::clock::SystemClock;
use crate::error::BotResult;
use crate::poller::{Poller, PollerSettings};
use crate::telegram::TelegramNotifier;
use hwbot_common::{Cursor, PracticumClient};
use hwbot_config::Config;
use hwbot_i18n::Catalog;
use tracing::info;

/// The production poller.
pub type BotPoller = Poller<PracticumClient, TelegramNotifier, SystemClock>;

/// Homework review notification bot.
#[derive(Debug)]
pub struct HomeworkBot {
    poller: BotPoller,
}

impl HomeworkBot {
    /// Validate `config` and build every client. Fails before any network traffic.
    pub fn new(config: &Config) -> BotResult<Self> {
        config.validate()?;

        let source = PracticumClient::new(config.practicum_client_config())?;
        let notifier = TelegramNotifier::from_config(&config.telegram)?;
        let catalog = Catalog::for_language(&config.i18n.language)?;
        info!(
            endpoint = source.endpoint(),
            chat_id = %notifier.chat_id(),
            language = catalog.locale().code(),
            "Homework bot configured"
        );

        let poller = Poller::new(
            source,
            notifier,
            SystemClock,
            catalog,
            PollerSettings::from_config(&config.polling),
            config.polling.initial_cursor.map(Cursor),
        );
        Ok(Self { poller })
    }

    /// Cursor of the next poll.
    pub const fn cursor(&self) -> Cursor {
        self.poller.cursor()
    }

    /// Poll until the task is cancelled.
    pub async fn run(&mut self) {
        self.poller.run().await;
    }
}
