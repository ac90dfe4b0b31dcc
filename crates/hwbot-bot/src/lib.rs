//! # Homework Bot
//!
//! Polls the Practicum review API and relays homework status changes to a
//! Telegram chat.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod clock;
pub mod error;
pub mod notifier;
pub mod poller;
pub mod telegram;

pub use bot::{BotPoller, HomeworkBot};
pub use clock::{Clock, SystemClock};
pub use error::{BotError, BotResult};
pub use notifier::{deliver, MessageSink};
pub use poller::{IterationReport, Poller, PollerSettings, ReviewSource};
pub use telegram::TelegramNotifier;
