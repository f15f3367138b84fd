//! FILENAME: app/src/logging.rs
// PURPOSE: Unified logging for the dashboard backend.
// FORMAT: seq|level|category|message
// CONTEXT: The category macros route through the `log` facade with the category
// as the target, so engine crates logging via `log::warn!` land in the same stream.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use log::{Level, Log, Metadata, Record};
use once_cell::sync::Lazy;

use crate::config::{ConfigError, LoggingConfig};

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

/// Global sequence counter
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Global log file handle
pub static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

static LOGGER: DashboardLogger = DashboardLogger;

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

fn level_code(level: Level) -> &'static str {
    match level {
        Level::Error => "E",
        Level::Warn => "W",
        Level::Info => "I",
        Level::Debug => "D",
        Level::Trace => "T",
    }
}

/// Formats one line. Engine crates log under their module path; the last
/// segment is used as the category.
pub fn format_line(seq: u64, level: Level, target: &str, message: &str) -> String {
    let category = target.rsplit("::").next().unwrap_or(target);
    format!("{}|{}|{}|{}", seq, level_code(level), category.to_uppercase(), message)
}

/// `log::Log` implementation writing to stderr and the optional log file.
pub struct DashboardLogger;

impl Log for DashboardLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            next_seq(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );

        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                if let Err(e) = writeln!(file, "{}", line) {
                    eprintln!("[LOG_ERROR] Failed to write: {}", e);
                }
            }
        }

        eprintln!("{}", line);
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                let _ = file.flush();
            }
        }
    }
}

/// Installs the logger (once per process) and applies `config`.
/// Calling it again only updates the level and the log file.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<PathBuf>, ConfigError> {
    let level = config.level_filter()?;

    if log::set_logger(&LOGGER).is_err() {
        eprintln!("[LOG_INIT] Logger already installed, updating settings");
    }
    log::set_max_level(level);

    let file = match &config.file {
        Some(path) => Some(
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .map_err(|source| ConfigError::LogFile {
                    path: path.clone(),
                    source,
                })?,
        ),
        None => None,
    };

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = file;
    }

    Ok(config.file.clone())
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        ::log::info!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        ::log::warn!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($cat:expr, $($arg:tt)*) => {
        ::log::error!(target: $cat, $($arg)*)
    };
}

// ENTER/EXIT macros for command tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        ::log::debug!(target: $cat, "ENTER {}", $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, "ENTER {} {}", $func, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        ::log::debug!(target: $cat, "EXIT {}", $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, "EXIT {} {}", $func, format!($($arg)*))
    };
}

pub use log_info;
pub use log_warn;
pub use log_error;
pub use log_enter;
pub use log_exit;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        assert_eq!(format_line(7, Level::Info, "SCREEN", "loaded"), "7|I|SCREEN|loaded");
        assert_eq!(
            format_line(8, Level::Warn, "view_engine::compile", "degraded"),
            "8|W|COMPILE|degraded"
        );
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let a = next_seq();
        let b = next_seq();
        assert!(b > a);
    }

    #[test]
    fn test_init_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.log");
        let config = LoggingConfig {
            level: "debug".to_string(),
            file: Some(path.clone()),
        };

        assert_eq!(init_logging(&config).unwrap(), Some(path.clone()));
        log_info!("TEST", "hello {}", 42);
        log::logger().flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().any(|l| l.ends_with("|I|TEST|hello 42")));

        init_logging(&LoggingConfig::default()).unwrap();
    }
}
