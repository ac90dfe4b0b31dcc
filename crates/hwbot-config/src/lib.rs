//! # Homework Bot Config
//!
//! Type-safe configuration management for the homework bot.
//!
//! This crate provides configuration loading from files, `.env` and the
//! process environment, plus validation run once before the poll loop starts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
