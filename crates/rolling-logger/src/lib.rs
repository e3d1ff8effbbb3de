//! Rolling Logger
//!
//! `log` backend that keeps the most recent lines in a circular buffer and
//! forwards every line to a sink (the browser console in the app).

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Receives each formatted line as it is logged
pub type Sink = Box<dyn Fn(Level, &str) + Send + Sync>;

/// Logger settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoggerConfig {
    /// Number of lines kept in memory
    pub capacity: usize,
    pub level: LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            capacity: 500,
            level: LevelFilter::Info,
        }
    }
}

pub struct RollingLogger {
    buffer: Mutex<VecDeque<String>>,
    capacity: usize,
    level: LevelFilter,
    sink: Sink,
}

impl RollingLogger {
    pub fn new(config: LoggerConfig, sink: Sink) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            level: config.level,
            sink,
        }
    }

    /// Buffered lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        match self.buffer.lock() {
            Ok(buffer) => buffer.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn push(&self, line: String) {
        if let Ok(mut buffer) = self.buffer.lock() {
            while buffer.len() >= self.capacity {
                buffer.pop_front();
            }
            buffer.push_back(line);
        }
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{} {:<5} {}: {}",
            chrono::Utc::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );
        (self.sink)(record.level(), &line);
        self.push(line);
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Install the global logger. Fails if another logger is already set.
pub fn init(config: LoggerConfig, sink: Sink) -> Result<&'static RollingLogger, SetLoggerError> {
    let level = config.level;
    let logger = LOGGER.get_or_init(|| RollingLogger::new(config, sink));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(logger)
}

/// Lines captured by the global logger, empty if it was never installed
pub fn recent() -> Vec<String> {
    LOGGER.get().map(RollingLogger::recent).unwrap_or_default()
}
