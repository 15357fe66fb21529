//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr (or the configured file) so that command output on
//! stdout stays machine-readable.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the computed filter
pub const LOG_ENV: &str = "CONTACTREGISTER_LOG";

/// Filter directive for the configured level; `verbose` forces debug
pub fn filter_directive(level: &str, verbose: bool) -> String {
    let level = if verbose {
        "debug".to_string()
    } else {
        level.trim().to_ascii_lowercase()
    };
    format!("contactregister={}", level)
}

pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level, verbose)));

    let result = match config.file {
        Some(ref log_file) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init(),
    };

    result.map_err(|e| Error::Configuration {
        reason: format!("failed to initialise logging: {}", e),
    })
}
