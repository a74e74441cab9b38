// RUNTIME PREFERENCES (User Experience)

use crate::logging::{codes, Code, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        codes::system::CONFIGURATION_ERROR
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Least severe level that is still emitted
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Warning),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether a leading UTF-8 byte order mark is removed before parsing
    pub strip_byte_order_mark: bool,

    /// Whether successful file loads are reported at debug level
    pub log_file_metrics: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            strip_byte_order_mark: env_flag(env_vars::FILE_STRIP_BOM, true),
            log_file_metrics: env_flag(env_vars::FILE_LOG_METRICS, false),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub logging: LoggingPreferences,
    pub file_processor: FileProcessorPreferences,
}

impl RuntimeConfig {
    /// Parse a configuration from TOML text; missing sections use defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "SCRIPT_PARSER_LOGGING_USE_STRUCTURED";
    pub const LOGGING_MIN_LEVEL: &str = "SCRIPT_PARSER_LOGGING_MIN_LEVEL";

    // File Processor
    pub const FILE_STRIP_BOM: &str = "SCRIPT_PARSER_FILE_STRIP_BOM";
    pub const FILE_LOG_METRICS: &str = "SCRIPT_PARSER_FILE_LOG_METRICS";
}
