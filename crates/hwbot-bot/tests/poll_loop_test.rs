//! End-to-end poll loop scenarios with in-memory fakes.

use async_trait::async_trait;
use hwbot_bot::{BotError, Clock, HomeworkBot, MessageSink, Poller, PollerSettings, ReviewSource};
use hwbot_common::test_utils::api_fixtures::{empty_response, homework, response};
use hwbot_common::test_utils::init_test_logging;
use hwbot_common::{ChatId, Cursor, HwbotError, Result};
use hwbot_config::{Config, ProcessMode};
use hwbot_i18n::{Catalog, Locale};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays scripted answers and records the cursors it was asked for.
#[derive(Clone, Default)]
struct ScriptedSource {
    answers: Arc<Mutex<VecDeque<Result<Value>>>>,
    cursors: Arc<Mutex<Vec<Cursor>>>,
}

impl ScriptedSource {
    fn new(answers: Vec<Result<Value>>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into())),
            cursors: Arc::default(),
        }
    }

    fn cursors(&self) -> Vec<Cursor> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewSource for ScriptedSource {
    async fn get_api_answer(&self, cursor: Cursor) -> Result<Value> {
        self.cursors.lock().unwrap().push(cursor);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(empty_response(cursor.as_secs())))
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send_message(&self, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct FixedClock(i64);

#[async_trait]
impl Clock for FixedClock {
    fn now(&self) -> Cursor {
        Cursor(self.0)
    }

    async fn sleep(&self, _duration: Duration) {}
}

fn poller_with(
    source: &ScriptedSource,
    sink: &RecordingSink,
    settings: PollerSettings,
) -> Poller<ScriptedSource, RecordingSink, FixedClock> {
    init_test_logging();
    Poller::new(
        source.clone(),
        sink.clone(),
        FixedClock(5_000),
        Catalog::new(Locale::Russian).unwrap(),
        settings,
        Some(Cursor::EPOCH),
    )
}

#[tokio::test]
async fn test_cursor_threads_through_iterations() {
    let source = ScriptedSource::new(vec![
        Ok(response(vec![homework("proj1", "reviewing")], 1000)),
        Ok(response(vec![homework("proj1", "approved")], 2000)),
        Ok(empty_response(3000)),
    ]);
    let sink = RecordingSink::default();
    let mut poller = poller_with(&source, &sink, PollerSettings::default());

    poller.run_for(3).await;

    assert_eq!(
        source.cursors(),
        vec![Cursor(0), Cursor(1000), Cursor(2000)]
    );
    assert_eq!(
        sink.sent(),
        vec![
            "Изменился статус проверки работы \"proj1\". Работа взята на проверку ревьюером.".to_string(),
            "Изменился статус проверки работы \"proj1\". Работа проверена: ревьюеру всё понравилось. Ура!".to_string(),
        ]
    );
    assert_eq!(poller.cursor(), Cursor(3000));
}

#[tokio::test]
async fn test_failures_are_notified_every_time_and_loop_recovers() {
    let source = ScriptedSource::new(vec![
        Err(HwbotError::practicum_with_status("Unexpected response status: 500", 500)),
        Err(HwbotError::practicum_with_status("Unexpected response status: 500", 500)),
        Ok(response(vec![homework("proj2", "rejected")], 900)),
    ]);
    let sink = RecordingSink::default();
    let mut poller = poller_with(&source, &sink, PollerSettings::default());

    poller.run_for(3).await;

    let sent = sink.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], "Сбой в работе программы: Статус ответа сервера: 500");
    assert_eq!(sent[0], sent[1]);
    assert!(sent[2].ends_with("Работа проверена: у ревьюера есть замечания."));
    assert_eq!(
        source.cursors(),
        vec![Cursor(0), Cursor(0), Cursor(0)]
    );
}

#[tokio::test]
async fn test_all_mode_delivers_good_entries_and_reports_bad_one() {
    let source = ScriptedSource::new(vec![Ok(response(
        vec![
            homework("a", "approved"),
            homework("b", "on_hold"),
            homework("c", "reviewing"),
        ],
        400,
    ))]);
    let sink = RecordingSink::default();
    let settings = PollerSettings {
        process: ProcessMode::All,
        ..PollerSettings::default()
    };
    let mut poller = poller_with(&source, &sink, settings);

    assert!(poller.run_iteration().await.is_none());

    let sent = sink.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].contains("\"a\""));
    assert!(sent[1].contains("\"c\""));
    assert!(sent[2].contains("on_hold"));
    assert_eq!(poller.cursor(), Cursor(400));
}

#[test]
fn test_bot_refuses_to_start_without_credentials() {
    let err = HomeworkBot::new(&Config::default()).unwrap_err();
    match err {
        BotError::Common(inner) => {
            let message = inner.to_string();
            assert!(message.contains("PRACTICUM_TOKEN"));
            assert!(message.contains("TELEGRAM_TOKEN"));
            assert!(message.contains("TELEGRAM_CHAT_ID"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_bot_refuses_unsupported_language() {
    let mut config = Config::default();
    config.practicum.token = "p".to_string();
    config.telegram.token = "t".to_string();
    config.telegram.chat_id = Some(ChatId::Id(1));
    config.i18n.language = "fr-FR".to_string();

    assert!(matches!(HomeworkBot::new(&config), Err(BotError::I18n(_))));
}

#[test]
fn test_bot_starts_from_configured_cursor() {
    let mut config = Config::default();
    config.practicum.token = "p".to_string();
    config.telegram.token = "t".to_string();
    config.telegram.chat_id = Some(ChatId::Id(1));
    config.polling.initial_cursor = Some(0);

    let bot = HomeworkBot::new(&config).unwrap();
    assert_eq!(bot.cursor(), Cursor::EPOCH);
}
