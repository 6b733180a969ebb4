//! Error types for the akshar crate.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for akshar operations.
///
/// None of these escape the session flows: a failed transliteration call
/// degrades to keeping the typed word.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from underlying system calls.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The transliteration backend could not be reached or refused the call.
    #[error("transliteration backend error: {message}")]
    Backend { message: String },

    /// The backend answered with something other than a suggestion list.
    #[error("malformed transliteration response: {message}")]
    MalformedResponse { message: String },

    /// A configuration file could not be parsed.
    #[error("invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// The tracing subscriber could not be installed.
    #[error("logging setup failed: {message}")]
    Logging { message: String },

    /// The dispatcher worker is gone.
    #[error("request dispatcher has shut down")]
    DispatcherClosed,
}

impl Error {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}

/// Result alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;
