//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The interactive dashboard owns the terminal, so its logs go to a file. Headless runs
//! log to stderr and keep stdout for the report.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub target: LogTarget,
}

impl LogConfig {
    pub fn new(debug: bool, target: LogTarget) -> Self {
        let level = if debug { Level::DEBUG } else { Level::INFO };
        Self { level, target }
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let filter = build_env_filter(config.level);

    match &config.target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .map_err(io::Error::other)?;
        }
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time();
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .map_err(io::Error::other)?;
        }
    }
    Ok(())
}

fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    // Dependencies stay at warn.
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,conflict_explorer={level}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_level() {
        assert_eq!(LogConfig::new(true, LogTarget::Stderr).level, Level::DEBUG);
        assert_eq!(
            LogConfig::new(false, LogTarget::File("x.log".into())).level,
            Level::INFO
        );
    }
}
