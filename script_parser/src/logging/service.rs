//! Logger implementations
//!
//! The parsing core never reaches for a global logger. Every character source
//! carries an `Arc<dyn Logger>` and the parser threads it through to handlers,
//! so tests can swap in a [`MemoryLogger`] and inspect what was reported.

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use crate::config::runtime::LoggingPreferences;
use std::sync::{Arc, Mutex, MutexGuard};

/// Leveled logging sink
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Simple console logger
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            match event.level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", event.format()),
                _ => println!("{}", event.format()),
            }
        }
    }
}

/// Structured logger emitting one JSON object per line
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level > self.min_level {
            return;
        }
        // Fall back to the plain format if JSON serialization fails
        let line = event.format_json().unwrap_or_else(|_| event.format());
        match event.level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// Logger that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Memory logger for testing
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn get_warnings(&self) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter(|e| e.is_warning())
            .cloned()
            .collect()
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter(|e| e.code == code)
            .cloned()
            .collect()
    }

    pub fn has_event_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.code == code)
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();

        // Respect buffer size limits from config
        let max_events = config::get_event_buffer_size();
        if events.len() >= max_events {
            let remove_count = events.len() - max_events + 1;
            events.drain(0..remove_count);
        }

        events.push(event.clone());
    }
}

/// Build the logger selected by the runtime preferences
pub fn create_configured_logger(preferences: &LoggingPreferences) -> Arc<dyn Logger> {
    if preferences.use_structured_logging {
        Arc::new(StructuredLogger::new(preferences.min_log_level))
    } else {
        Arc::new(ConsoleLogger::new(preferences.min_log_level))
    }
}

/// Logger used when a caller does not supply one
pub fn default_logger() -> Arc<dyn Logger> {
    create_configured_logger(&config::get_preferences())
}
