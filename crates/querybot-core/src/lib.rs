//! Core building blocks shared by every Querybot provider.
//!
//! - [`config`] — JSON config schema, loader, and env var overrides
//! - [`error`] — the [`QueryError`] taxonomy surfaced to callers
//! - [`format`] — bold delimiters, canonical sentences, duration humanizing
//! - [`utils`] — data directory helpers

pub mod config;
pub mod error;
pub mod format;
pub mod utils;

pub use config::Config;
pub use error::{QueryError, Result};
