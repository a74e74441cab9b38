//! Logging macros taking the target logger as first argument
//!
//! Context values accept any `Display` type:
//!
//! ```ignore
//! log_warning!(source.logger(), codes::parse::BROKEN_TOKEN_SYNTAX, "Broken token syntax",
//!     position = source.position(),
//!     "skipped" => skipped);
//! ```

/// Build a `LogEvent` from optional position and `"key" => value` pairs and send it
#[doc(hidden)]
#[macro_export]
macro_rules! __emit_event {
    ($logger:expr, $event:expr) => {
        {
            use $crate::logging::Logger as _;
            let event = $event;
            ($logger).log(&event)
        }
    };

    ($logger:expr, $event:expr, position = $position:expr) => {
        {
            use $crate::logging::Logger as _;
            let event = $event.with_position($position);
            ($logger).log(&event)
        }
    };

    ($logger:expr, $event:expr, position = $position:expr, $($key:expr => $value:expr),+) => {
        {
            use $crate::logging::Logger as _;
            let mut event = $event.with_position($position);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            ($logger).log(&event)
        }
    };

    ($logger:expr, $event:expr, $($key:expr => $value:expr),+) => {
        {
            use $crate::logging::Logger as _;
            let mut event = $event;
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            ($logger).log(&event)
        }
    };
}

/// Log error with Code type
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $code:expr, $message:expr $(, $($rest:tt)*)?) => {
        $crate::__emit_event!($logger, $crate::logging::LogEvent::error($code, $message) $(, $($rest)*)?)
    };
}

/// Log warning with Code type
#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $code:expr, $message:expr $(, $($rest:tt)*)?) => {
        $crate::__emit_event!($logger, $crate::logging::LogEvent::warning($code, $message) $(, $($rest)*)?)
    };
}

/// Log informational message with Code type
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $code:expr, $message:expr $(, $($rest:tt)*)?) => {
        $crate::__emit_event!($logger, $crate::logging::LogEvent::info($code, $message) $(, $($rest)*)?)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $message:expr $(, $($rest:tt)*)?) => {
        $crate::__emit_event!($logger, $crate::logging::LogEvent::debug($message) $(, $($rest)*)?)
    };
}
