//! Configuration access for logging
//!
//! Buffer sizes are compile-time constants; level and output format are
//! runtime preferences that may be installed once at startup.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences. Fails if preferences were already installed.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

/// Get runtime preferences (with fallback to environment defaults)
pub fn get_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Maximum events retained by in-memory loggers
pub fn get_event_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

/// Maximum length of a single log message
pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}
