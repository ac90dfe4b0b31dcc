//! # Homework Bot I18n
//!
//! Message catalogue for homework bot notifications, built on Fluent.
//!
//! Locale files live in `locales/<code>/main.ftl`, are validated by the build
//! script and compiled into the binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod error;
pub mod locale;

pub use catalog::*;
pub use error::*;
pub use locale::*;
