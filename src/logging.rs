//! File logging via `tracing-subscriber`.
//!
//! The terminal belongs to the TUI, so events go to a log file. Nothing
//! here is fatal: if the file cannot be opened the app runs without logs.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogSettings, default_log_path};

const DEFAULT_FILTER: &str = "varispeed=info";

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("no log file location (set log.file or $HOME)")]
    NoPath,

    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("logger already installed: {0}")]
    Install(String),
}

/// `RUST_LOG` wins over the configured filter; blank values fall through.
pub fn filter_directive(settings: &LogSettings, env: Option<&str>) -> String {
    [env, Some(settings.filter.as_str())]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Install the global subscriber. Returns the log file path on success.
pub fn init(settings: &LogSettings) -> Result<PathBuf, LogInitError> {
    let path = settings
        .file
        .clone()
        .or_else(default_log_path)
        .ok_or(LogInitError::NoPath)?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| LogInitError::Open {
            path: path.clone(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LogInitError::Open {
            path: path.clone(),
            source,
        })?;

    let env = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(settings, env.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| LogInitError::Install(e.to_string()))?;

    Ok(path)
}
