// src/lib.rs

pub mod backend;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod terminal;

pub use crate::config::Config;
pub use crate::core::session::{Completion, DelimiterOutcome, WordSuggestionSession};
pub use crate::error::{Error, Result};
