//! Test utilities and shared test helpers for the homework bot.
//!
//! Fixtures build review API bodies in the shape the real endpoint returns,
//! so tests in every crate describe the same wire format.

use serde_json::{json, Value};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Review API fixtures.
pub mod api_fixtures {
    use super::*;

    /// One homework entry as the API sends it.
    pub fn homework(name: &str, status: &str) -> Value {
        json!({
            "id": 124,
            "status": status,
            "homework_name": name,
            "reviewer_comment": "",
            "date_updated": "2024-01-01T12:00:00Z",
            "lesson_name": "Final project"
        })
    }

    /// A full response body.
    pub fn response(homeworks: Vec<Value>, current_date: i64) -> Value {
        json!({
            "homeworks": homeworks,
            "current_date": current_date
        })
    }

    /// A response with nothing new.
    pub fn empty_response(current_date: i64) -> Value {
        response(Vec::new(), current_date)
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// A minimal valid YAML configuration.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
practicum:
  token: "test_practicum_token"

telegram:
  token: "123456:test_telegram_token"
  chat_id: 987654321
"#
    }

    /// A YAML configuration exercising every section.
    pub fn full_config_yaml() -> &'static str {
        concat!(
            "practicum:\n",
            "  token: \"test_practicum_token\"\n",
            "  endpoint: \"http://localhost:8080/api/user_api/homework_statuses/\"\n",
            "  timeout_secs: 10\n",
            "\n",
            "telegram:\n",
            "  token: \"123456:test_telegram_token\"\n",
            "  chat_id: \"@homework_feed\"\n",
            "  api_url: \"http://localhost:8081\"\n",
            "  timeout_secs: 15\n",
            "\n",
            "polling:\n",
            "  interval_secs: 60\n",
            "  initial_cursor: 0\n",
            "  cursor_source: local_clock\n",
            "  process: all\n",
            "\n",
            "logging:\n",
            "  level: \"debug\"\n",
            "  max_files: 3\n",
            "\n",
            "i18n:\n",
            "  language: \"en-US\"\n",
        )
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use proptest::prelude::*;

    /// Strategy for status strings outside the verdict table.
    pub fn unknown_status_strategy() -> impl Strategy<Value = String> {
        "[a-z_]{1,12}".prop_filter("must not be a documented status", |s| {
            !matches!(s.as_str(), "approved" | "reviewing" | "rejected")
        })
    }
}
