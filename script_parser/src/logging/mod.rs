//! Logging for the script parser
//!
//! The parser reports recoverable problems (broken token syntax, failed
//! numeric conversions, missing files) through a [`Logger`] passed in by the
//! caller instead of a process-wide singleton.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    create_configured_logger, default_logger, ConsoleLogger, Logger, MemoryLogger, NullLogger,
    StructuredLogger,
};
