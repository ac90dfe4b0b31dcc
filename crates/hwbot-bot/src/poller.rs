//! The poll loop.
//!
//! One iteration asks the review API for statuses changed since the cursor,
//! validates the answer, notifies the chat and moves the cursor forward. Any
//! failure becomes a single chat message; the loop itself never stops.

use crate::clock::Clock;
use crate::notifier::{deliver, MessageSink};
use async_trait::async_trait;
use hwbot_common::{
    check_response, format_epoch, Cursor, HomeworkBatch, HomeworkRecord, HwbotError,
    PracticumClient, Result,
};
use hwbot_config::{CursorSource, PollingConfig, ProcessMode};
use hwbot_i18n::Catalog;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Where review statuses come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Raw API answer for statuses changed since `cursor`.
    async fn get_api_answer(&self, cursor: Cursor) -> Result<Value>;
}

#[async_trait]
impl ReviewSource for PracticumClient {
    async fn get_api_answer(&self, cursor: Cursor) -> Result<Value> {
        Self::get_api_answer(self, cursor).await
    }
}

/// Loop tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    /// Pause after every iteration.
    pub interval: Duration,
    /// How the cursor advances.
    pub cursor_source: CursorSource,
    /// Which entries are notified.
    pub process: ProcessMode,
}

impl PollerSettings {
    /// Settings from the `polling` configuration section.
    pub const fn from_config(config: &PollingConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            cursor_source: config.cursor_source,
            process: config.process,
        }
    }
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default())
    }
}

/// Outcome of a successful iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    /// Entries in the API answer.
    pub fetched: usize,
    /// Status messages delivered.
    pub notified: usize,
    /// Cursor for the next poll.
    pub cursor: Cursor,
}

/// Polls the review API and relays status changes to the chat.
#[derive(Debug)]
pub struct Poller<S, M, C> {
    source: S,
    sink: M,
    clock: C,
    catalog: Catalog,
    settings: PollerSettings,
    cursor: Cursor,
}

impl<S, M, C> Poller<S, M, C>
where
    S: ReviewSource,
    M: MessageSink,
    C: Clock,
{
    /// Create a poller. `initial_cursor` of `None` starts from the current time.
    pub fn new(
        source: S,
        sink: M,
        clock: C,
        catalog: Catalog,
        settings: PollerSettings,
        initial_cursor: Option<Cursor>,
    ) -> Self {
        let cursor = initial_cursor.unwrap_or_else(|| clock.now());
        Self {
            source,
            sink,
            clock,
            catalog,
            settings,
            cursor,
        }
    }

    /// Cursor the next poll will send.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Notification text for one raw homework entry.
    pub fn parse_status(&self, homework: &Value) -> Result<String> {
        let record = HomeworkRecord::from_value(homework)?;
        let status = record.parsed_status()?;
        self.catalog
            .status_changed(&record.homework_name, status)
            .map_err(|e| HwbotError::with_source("Failed to format status notification", e))
    }

    /// One fetch, validate and notify pass, without error reporting.
    ///
    /// Once the answer is fetched and validated the cursor advances even if
    /// an entry cannot be turned into a message, so a bad record is reported
    /// once instead of on every poll.
    #[instrument(skip(self), fields(cursor = %self.cursor))]
    pub async fn poll_once(&mut self) -> Result<IterationReport> {
        let answer = self.source.get_api_answer(self.cursor).await?;
        let batch = check_response(answer)?;

        if batch.is_empty() {
            debug!("No new homework statuses");
        }

        let selected: &[Value] = match self.settings.process {
            ProcessMode::Newest => batch.newest().map(std::slice::from_ref).unwrap_or_default(),
            ProcessMode::All => &batch.homeworks,
        };

        let mut notified = 0;
        let mut first_error = None;
        for homework in selected {
            match self.parse_status(homework) {
                Ok(text) => {
                    if deliver(&self.sink, &text).await {
                        notified += 1;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Skipping homework entry");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        self.cursor = self.next_cursor(&batch);
        debug!(
            "Next poll from {} ({})",
            self.cursor,
            format_epoch(self.cursor.as_secs())
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(IterationReport {
                fetched: batch.homeworks.len(),
                notified,
                cursor: self.cursor,
            }),
        }
    }

    fn next_cursor(&self, batch: &HomeworkBatch) -> Cursor {
        match self.settings.cursor_source {
            CursorSource::LocalClock => self.clock.now(),
            CursorSource::Server => batch.current_date.map_or_else(
                || {
                    warn!("Answer has no current_date, advancing cursor from the local clock");
                    self.clock.now()
                },
                Cursor,
            ),
        }
    }

    /// One iteration with error reporting: a failure is logged and sent to the chat.
    pub async fn run_iteration(&mut self) -> Option<IterationReport> {
        match self.poll_once().await {
            Ok(report) => {
                info!(
                    fetched = report.fetched,
                    notified = report.notified,
                    "Poll iteration finished"
                );
                Some(report)
            }
            Err(e) => {
                self.report_failure(&e).await;
                None
            }
        }
    }

    async fn report_failure(&self, err: &HwbotError) {
        error!(error = %err, error_class = err.class().as_str(), "Poll iteration failed");
        match self.catalog.failure(err) {
            Ok(text) => {
                deliver(&self.sink, &text).await;
            }
            Err(e) => error!(error = %e, "Failed to format failure notification"),
        }
    }

    /// Run `iterations` iterations, each followed by the configured pause.
    pub async fn run_for(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.run_iteration().await;
            self.clock.sleep(self.settings.interval).await;
        }
    }

    /// Run forever.
    pub async fn run(&mut self) {
        info!(
            interval_secs = self.settings.interval.as_secs(),
            "Starting poll loop from {}",
            format_epoch(self.cursor.as_secs())
        );
        loop {
            self.run_iteration().await;
            self.clock.sleep(self.settings.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notifier::MockMessageSink;
    use hwbot_common::test_utils::api_fixtures::{empty_response, homework, response};
    use hwbot_i18n::Locale;
    use mockall::predicate::eq;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::new(Locale::Russian).unwrap()
    }

    fn source_answering(cursor: i64, body: Value) -> MockReviewSource {
        let mut source = MockReviewSource::new();
        source
            .expect_get_api_answer()
            .with(eq(Cursor(cursor)))
            .times(1)
            .returning(move |_| Ok(body.clone()));
        source
    }

    fn sink_expecting(expected: &'static str) -> MockMessageSink {
        let mut sink = MockMessageSink::new();
        sink.expect_send_message()
            .withf(move |text| text.to_string() == expected)
            .times(1)
            .returning(|_| Ok(()));
        sink
    }

    fn poller(
        source: MockReviewSource,
        sink: MockMessageSink,
        clock: ManualClock,
        settings: PollerSettings,
    ) -> Poller<MockReviewSource, MockMessageSink, ManualClock> {
        Poller::new(source, sink, clock, catalog(), settings, Some(Cursor(0)))
    }

    #[tokio::test]
    async fn test_status_change_is_notified_and_cursor_advances() {
        let source = source_answering(0, response(vec![homework("proj1", "reviewing")], 1000));
        let sink = sink_expecting(
            "Изменился статус проверки работы \"proj1\". Работа взята на проверку ревьюером.",
        );
        let mut poller = poller(source, sink, ManualClock::starting_at(5), PollerSettings::default());

        poller.run_for(1).await;

        assert_eq!(poller.cursor(), Cursor(1000));
        assert_eq!(poller.clock.sleeps(), vec![Duration::from_secs(600)]);
    }

    #[tokio::test]
    async fn test_only_newest_entry_by_default() {
        let source = source_answering(
            0,
            response(
                vec![homework("new", "approved"), homework("old", "rejected")],
                50,
            ),
        );
        let sink = sink_expecting(
            "Изменился статус проверки работы \"new\". Работа проверена: ревьюеру всё понравилось. Ура!",
        );
        let mut poller = poller(source, sink, ManualClock::default(), PollerSettings::default());

        let report = poller.poll_once().await.unwrap();
        assert_eq!(report.fetched, 2);
        assert_eq!(report.notified, 1);
    }

    #[tokio::test]
    async fn test_newest_mode_ignores_broken_older_entries() {
        let source = source_answering(
            0,
            response(
                vec![homework("new", "rejected"), json!({"homework_name": "old"})],
                60,
            ),
        );
        let sink = sink_expecting(
            "Изменился статус проверки работы \"new\". Работа проверена: у ревьюера есть замечания.",
        );
        let mut poller = poller(source, sink, ManualClock::default(), PollerSettings::default());

        let report = poller.poll_once().await.unwrap();
        assert_eq!(report.notified, 1);
        assert_eq!(poller.cursor(), Cursor(60));
    }

    #[tokio::test]
    async fn test_all_entries_when_configured() {
        let source = source_answering(
            0,
            response(
                vec![homework("a", "approved"), homework("b", "rejected")],
                50,
            ),
        );
        let mut sink = MockMessageSink::new();
        sink.expect_send_message().times(2).returning(|_| Ok(()));
        let settings = PollerSettings {
            process: ProcessMode::All,
            ..PollerSettings::default()
        };
        let mut poller = poller(source, sink, ManualClock::default(), settings);

        let report = poller.poll_once().await.unwrap();
        assert_eq!(report.notified, 2);
    }

    #[tokio::test]
    async fn test_empty_list_sends_nothing_and_advances() {
        let source = source_answering(0, empty_response(777));
        let mut sink = MockMessageSink::new();
        sink.expect_send_message().never();
        let mut poller = poller(source, sink, ManualClock::default(), PollerSettings::default());

        let report = poller.run_iteration().await.unwrap();
        assert_eq!(report.fetched, 0);
        assert_eq!(poller.cursor(), Cursor(777));
    }

    #[tokio::test]
    async fn test_unknown_status_is_reported_and_cursor_still_advances() {
        let source = source_answering(0, response(vec![homework("proj1", "weird")], 1000));
        let mut sink = MockMessageSink::new();
        sink.expect_send_message()
            .withf(|text| {
                text.starts_with("Сбой в работе программы: ")
                    && text.contains("Недокументированный статус")
            })
            .times(1)
            .returning(|_| Ok(()));
        let mut poller = poller(source, sink, ManualClock::default(), PollerSettings::default());

        assert!(poller.run_iteration().await.is_none());
        assert_eq!(poller.cursor(), Cursor(1000));
    }

    #[tokio::test]
    async fn test_non_ok_status_sends_one_failure_and_keeps_cursor() {
        let mut source = MockReviewSource::new();
        source
            .expect_get_api_answer()
            .times(1)
            .returning(|_| Err(HwbotError::practicum_with_status("Unexpected response status: 500", 500)));
        let sink = sink_expecting("Сбой в работе программы: Статус ответа сервера: 500");
        let mut poller = poller(source, sink, ManualClock::default(), PollerSettings::default());

        poller.run_for(1).await;

        assert_eq!(poller.cursor(), Cursor(0));
        assert_eq!(poller.clock.sleeps().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_shape_keeps_cursor() {
        let source = source_answering(0, json!({"homeworks": "nope", "current_date": 10}));
        let sink = sink_expecting("Сбой в работе программы: homeworks не является списком!");
        let mut poller = poller(source, sink, ManualClock::default(), PollerSettings::default());

        assert!(poller.run_iteration().await.is_none());
        assert_eq!(poller.cursor(), Cursor(0));
    }

    #[tokio::test]
    async fn test_missing_current_date_falls_back_to_clock() {
        let source = source_answering(0, json!({"homeworks": []}));
        let mut sink = MockMessageSink::new();
        sink.expect_send_message().never();
        let mut poller = poller(source, sink, ManualClock::starting_at(4242), PollerSettings::default());

        poller.poll_once().await.unwrap();
        assert_eq!(poller.cursor(), Cursor(4242));
    }

    #[tokio::test]
    async fn test_local_clock_cursor_source() {
        let source = source_answering(0, empty_response(1000));
        let mut sink = MockMessageSink::new();
        sink.expect_send_message().never();
        let settings = PollerSettings {
            cursor_source: CursorSource::LocalClock,
            ..PollerSettings::default()
        };
        let mut poller = poller(source, sink, ManualClock::starting_at(99), settings);

        poller.poll_once().await.unwrap();
        assert_eq!(poller.cursor(), Cursor(99));
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_stop_the_loop() {
        let mut source = MockReviewSource::new();
        source
            .expect_get_api_answer()
            .times(2)
            .returning(|_| Ok(response(vec![homework("proj1", "approved")], 10)));
        let mut sink = MockMessageSink::new();
        sink.expect_send_message()
            .times(2)
            .returning(|_| Err(HwbotError::telegram_with_code("Bad Request: chat not found", 400)));
        let mut poller = poller(source, sink, ManualClock::default(), PollerSettings::default());

        poller.run_for(2).await;

        assert_eq!(poller.cursor(), Cursor(10));
    }

    #[test]
    fn test_parse_status_missing_field() {
        let poller = poller(
            MockReviewSource::new(),
            MockMessageSink::new(),
            ManualClock::default(),
            PollerSettings::default(),
        );
        let err = poller.parse_status(&json!({"status": "approved"})).unwrap_err();
        assert_eq!(err.class(), hwbot_common::ErrorClass::Validation);
    }

    #[test]
    fn test_initial_cursor_defaults_to_now() {
        let poller = Poller::new(
            MockReviewSource::new(),
            MockMessageSink::new(),
            ManualClock::starting_at(1234),
            catalog(),
            PollerSettings::default(),
            None,
        );
        assert_eq!(poller.cursor(), Cursor(1234));
    }
}
