//! Event system for parser logging

use super::codes::Code;
use crate::config::compile_time::logging::MAX_LOG_MESSAGE_LENGTH;
use crate::utils::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Parse a level name as used in environment variables and config files
    pub fn parse(level: &str) -> Option<Self> {
        match level.to_lowercase().as_str() {
            "error" | "0" => Some(LogLevel::Error),
            "warning" | "warn" | "1" => Some(LogLevel::Warning),
            "info" | "2" => Some(LogLevel::Info),
            "debug" | "3" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub position: Option<Position>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn with_level(level: LogLevel, code: Code, message: &str) -> Self {
        let mut message = message.to_string();
        if message.len() > MAX_LOG_MESSAGE_LENGTH {
            let mut cut = MAX_LOG_MESSAGE_LENGTH;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }

        Self {
            timestamp: Utc::now(),
            level,
            code,
            message,
            position: None,
            context: BTreeMap::new(),
        }
    }

    /// Create a new error event
    pub fn error(code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Error, code, message)
    }

    /// Create a new warning event
    pub fn warning(code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Warning, code, message)
    }

    /// Create a new info event
    pub fn info(code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Info, code, message)
    }

    /// Create a debug event (debug output may not need codes)
    pub fn debug(message: &str) -> Self {
        Self::with_level(LogLevel::Debug, Code::new("D000"), message)
    }

    /// Attach the source position the event refers to
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Add context data
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn is_debug(&self) -> bool {
        self.level == LogLevel::Debug
    }

    /// Get severity from the event code
    pub fn severity(&self) -> &'static str {
        super::codes::get_severity(self.code.as_str()).as_str()
    }

    /// Get category from the event code
    pub fn category(&self) -> &'static str {
        super::codes::get_category(self.code.as_str())
    }

    /// Format for display
    pub fn format(&self) -> String {
        let position_str = self
            .position
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();

        let mut output = format!(
            "[{}] {} - {}{}",
            self.level.as_str(),
            self.code.as_str(),
            self.message,
            position_str
        );

        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            output.push_str(&format!(" ({})", pairs.join(", ")));
        }

        output
    }

    /// Format as JSON for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if let Some(position) = &self.position {
            json["position"] = serde_json::json!({
                "line": position.line,
                "column": position.column,
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::Value::Object(
                self.context
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            );
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_warning_event_creation() {
        let event = LogEvent::warning(codes::parse::BROKEN_TOKEN_SYNTAX, "Broken token syntax");

        assert!(event.is_warning());
        assert_eq!(event.code.as_str(), "W040");
        assert_eq!(event.category(), "Parse");
    }

    #[test]
    fn test_event_with_context() {
        let event = LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "File not found")
            .with_context("path", "missing.txt");

        assert_eq!(event.context.get("path"), Some(&"missing.txt".to_string()));
    }

    #[test]
    fn test_event_formatting() {
        let event = LogEvent::warning(codes::parse::NUMERIC_CONVERSION_FAILED, "Bad number")
            .with_position(Position::new(12, 2, 5))
            .with_context("token", "abc");
        let formatted = event.format();

        assert!(formatted.contains("[WARN]"));
        assert!(formatted.contains("W041"));
        assert!(formatted.contains("at 2:5"));
        assert!(formatted.contains("token=abc"));
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::file_processing::PERMISSION_DENIED, "Access denied")
            .with_context("file", "test.txt");

        let json = event.format_json().unwrap();
        assert!(json.contains("\"level\":\"ERROR\""));
        assert!(json.contains("\"code\":\"E009\""));
        assert!(json.contains("\"message\":\"Access denied\""));
    }

    #[test]
    fn test_long_message_is_truncated() {
        let long = "x".repeat(MAX_LOG_MESSAGE_LENGTH + 10);
        let event = LogEvent::debug(&long);
        assert_eq!(event.message.len(), MAX_LOG_MESSAGE_LENGTH);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse("3"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
    }
}
