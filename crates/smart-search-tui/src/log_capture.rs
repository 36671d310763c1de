/// Debug console log capture system
///
/// This module provides a custom logger that captures all log messages
/// into a thread-safe circular buffer for display in the debug console.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{Level, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A single log entry with timestamp and metadata
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Thread-safe log buffer shared between logger and UI
pub type LogBuffer = Arc<Mutex<VecDeque<LogEntry>>>;

/// Custom logger that captures logs to both env_logger and our buffer
pub struct DebugConsoleLogger {
    logs: LogBuffer,
    env_logger: env_logger::Logger,
    console_filter: env_logger::Logger,
}

impl DebugConsoleLogger {
    /// Create a new debug console logger with env_logger backend
    pub fn new(logs: LogBuffer) -> Self {
        // Terminal output only gets errors; anything else would corrupt the TUI
        let env_logger = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .build();

        // Default: the search core and this binary at Debug, RUST_LOG overrides
        let console_filter = if std::env::var("RUST_LOG").is_ok() {
            env_logger::Builder::from_default_env().build()
        } else {
            env_logger::Builder::new()
                .filter_module("smart_search", log::LevelFilter::Debug)
                .filter_module("smart_search_tui", log::LevelFilter::Debug)
                .build()
        };

        Self {
            logs,
            env_logger,
            console_filter,
        }
    }

    /// Create a new empty log buffer
    pub fn create_buffer() -> LogBuffer {
        Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES)))
    }
}

/// Append an entry, dropping the oldest one once the buffer is full
fn push_entry(logs: &LogBuffer, entry: LogEntry) {
    if let Ok(mut logs) = logs.lock() {
        if logs.len() >= MAX_LOG_ENTRIES {
            logs.pop_front();
        }
        logs.push_back(entry);
    }
}

impl Log for DebugConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console_filter.enabled(metadata) || self.env_logger.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.console_filter.enabled(record.metadata()) {
            push_entry(
                &self.logs,
                LogEntry {
                    timestamp: Utc::now(),
                    level: record.level(),
                    target: record.target().to_string(),
                    message: format!("{}", record.args()),
                },
            );
        }

        if self.env_logger.enabled(record.metadata()) {
            self.env_logger.log(record);
        }
    }

    fn flush(&self) {
        self.env_logger.flush();
    }
}

/// Initialize the debug console logger
///
/// Must be called once at startup before any logging occurs. Returns the
/// log buffer shared with the UI.
///
/// # Filtering with RUST_LOG
///
/// - No RUST_LOG (default): `smart_search` and `smart_search_tui` at Debug+
/// - `RUST_LOG=smart_search::reducer=debug`: only the reducer
/// - `RUST_LOG=info`: Info+ from all modules, dependencies included
///
/// Terminal output is always Error-level only.
pub fn init_logger() -> Result<LogBuffer> {
    let logs = DebugConsoleLogger::create_buffer();
    let logger = DebugConsoleLogger::new(logs.clone());

    log::set_boxed_logger(Box::new(logger)).context("Failed to initialize logger")?;
    log::set_max_level(log::LevelFilter::Debug);

    log::info!("Debug console initialized - press F12 to toggle");

    Ok(logs)
}
