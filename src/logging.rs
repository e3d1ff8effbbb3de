//! Logging setup
//!
//! Installs the rolling logger with the browser console as its sink.

use log::Level;
use rolling_logger::LoggerConfig;

use crate::config::ClientConfig;

fn console_sink(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

/// Install the global logger; a second call only logs a warning
pub fn init(config: &ClientConfig) {
    let logger_config = LoggerConfig {
        capacity: config.log_capacity,
        level: config.level_filter(),
    };
    match rolling_logger::init(logger_config, Box::new(console_sink)) {
        Ok(_) => log::info!("[APP] Logging at {} (keeping {} lines)", config.level_filter(), config.log_capacity),
        Err(e) => log::warn!("[APP] Logger already installed: {}", e),
    }
}
