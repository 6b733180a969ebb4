// File: src/backend/http.rs
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::backend::Transliterator;
use crate::config::BackendConfig;
use crate::error::{Error, Result};

#[derive(Serialize)]
struct TransliterateRequest<'a> {
    word: &'a str,
}

#[derive(Deserialize)]
struct TransliterateResponse {
    suggestions: Vec<String>,
}

/// Talks to a transliteration server over HTTP.
///
/// Each call POSTs `{"word": "..."}` as JSON and expects
/// `{"suggestions": ["...", ...]}` back.
pub struct HttpTransliterator {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpTransliterator {
    /// `None` disables the client's own 30 s default, leaving calls
    /// unbounded.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::backend(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(
            config.url.clone(),
            config.timeout_ms.map(Duration::from_millis),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Transliterator for HttpTransliterator {
    fn transliterate(&self, word: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&TransliterateRequest { word })
            .send()
            .map_err(|e| Error::backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::backend(format!("server answered {status}")));
        }
        let body = response.text().map_err(|e| Error::backend(e.to_string()))?;
        let suggestions = parse_response(&body)?;
        tracing::debug!(%word, ?suggestions, "transliterate");
        Ok(suggestions)
    }
}

/// Decodes a backend response body.
pub fn parse_response(body: &str) -> Result<Vec<String>> {
    serde_json::from_str::<TransliterateResponse>(body)
        .map(|response| response.suggestions)
        .map_err(|e| Error::malformed(e.to_string()))
}
