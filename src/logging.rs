//! Tracing subscriber setup
//!
//! Logs go to stderr and to the configured log file, which is truncated on
//! every start.

use crate::errors::{AgentError, Result};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the level filter from a `LOG_LEVEL` value.
///
/// Plain levels (`debug`, `WARNING`) and full directives
/// (`gamebuddy=debug,tower_http=info`) are both accepted.
pub fn level_filter(level: &str) -> EnvFilter {
    let normalized = match level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    };
    EnvFilter::try_new(&normalized).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber
pub fn init(level: &str, log_file: &Path) -> Result<()> {
    if let Some(dir) = log_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = File::create(log_file)?;

    tracing_subscriber::registry()
        .with(level_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| AgentError::ConfigError(format!("Failed to install logger: {}", e)))
}
