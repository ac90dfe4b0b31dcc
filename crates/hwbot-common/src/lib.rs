//! # Homework Bot Common
//!
//! Shared types, errors, logging and the review API client for the homework bot.
//!
//! This crate provides the foundational pieces used across all other crates
//! in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod practicum;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{ErrorClass, HwbotError, ResponseIssue, Result};
pub use logging::{init_default_logging, init_logging, LoggingConfig};
pub use practicum::{check_response, HomeworkBatch, PracticumClient, PracticumClientConfig};
pub use types::*;
pub use utils::*;
