//! Tracing setup for the front-ends.
//!
//! Library code only emits `tracing` events; the binaries pick where they go.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Error, Result};

/// Filter directive level for a verbosity count.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Initialize the logging system.
///
/// * `verbosity` - 0=error, 1=warn, 2=info, 3=debug, 4+=trace
/// * `log_file` - write to this file (append mode, no ANSI) instead of stderr
/// * `truncate` - empty `log_file` first
///
/// `RUST_LOG` overrides the verbosity when set.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>, truncate: bool) -> Result<()> {
    let level = level_for(verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("akshar={level},akshar_sim={level}")));

    match log_file {
        None => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(verbosity >= 3)
                    .with_line_number(verbosity >= 3),
            )
            .try_init()
            .map_err(|e| Error::Logging {
                message: e.to_string(),
            }),
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(!truncate)
                .write(true)
                .truncate(truncate)
                .open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_file(verbosity >= 3)
                        .with_line_number(verbosity >= 3),
                )
                .try_init()
                .map_err(|e| Error::Logging {
                    message: e.to_string(),
                })
        }
    }
}
