// File: src/config.rs
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::core::overlay::{OverlayStyle, DEFAULT_MAX_CANDIDATES};
use crate::core::script::ScriptRange;
use crate::error::{Error, Result};

/// Endpoint the transliteration backend listens on by default.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5001/transliterate";

const APP_DIR: &str = "akshar";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "akshar.log";

/// Everything the front-ends read at startup. Missing fields take defaults,
/// so a file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub script: ScriptRange,
    pub overlay: OverlayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    /// Per-request timeout. None leaves the call unbounded.
    pub timeout_ms: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub max_candidates: usize,
    pub padding: f32,
    pub gap: f32,
    pub row_height: f32,
}

impl OverlayConfig {
    pub fn style(&self) -> OverlayStyle {
        OverlayStyle {
            padding: self.padding,
            gap: self.gap,
            row_height: self.row_height,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        let style = OverlayStyle::default();
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            padding: style.padding,
            gap: style.gap,
            row_height: style.row_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 0=error, 1=warn, 2=info, 3=debug, 4+=trace
    pub verbosity: u8,
    pub file: Option<PathBuf>,
    /// Start each run with an empty log file.
    pub truncate: bool,
}

impl Config {
    /// `<data dir>/akshar/config.json`, falling back to the home directory.
    pub fn default_path() -> Option<PathBuf> {
        app_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// `<data dir>/akshar/akshar.log`.
    pub fn default_log_path() -> Option<PathBuf> {
        app_dir().map(|dir| dir.join(LOG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Writes the config atomically: into a temp file next to `path`, then
    /// renamed over it.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)?;

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp_file.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

fn app_dir() -> Option<PathBuf> {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_and_overlay_conventions() {
        let config = Config::default();
        assert_eq!(config.backend.url, "http://127.0.0.1:5001/transliterate");
        assert_eq!(config.backend.timeout_ms, None);
        assert_eq!(config.overlay.max_candidates, 5);
        assert_eq!(config.overlay.style(), OverlayStyle::default());
        assert_eq!(config.script, ScriptRange::devanagari());
        assert_eq!(config.logging.verbosity, 0);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"backend": {"timeout_ms": 1500}, "overlay": {"padding": 2}}"#)
                .unwrap();
        assert_eq!(config.backend.url, DEFAULT_BACKEND_URL);
        assert_eq!(config.backend.timeout_ms, Some(1500));
        assert_eq!(config.overlay.padding, 2.0);
        assert_eq!(config.overlay.row_height, 24.0);
    }
}
