//! Error type crossing the public parsing API
//!
//! Only unrecoverable conditions become a `ParseError`. Broken token syntax,
//! failed numeric conversions and missing files are logged and parsing
//! continues.

use crate::file_processor::FileProcessorError;
use crate::logging::{codes, Code};

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Undefined variable: @{name}")]
    UndefinedVariable { name: String },

    #[error("Invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("Invalid rule pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(transparent)]
    File(#[from] FileProcessorError),
}

impl ParseError {
    pub fn undefined_variable(name: &str) -> Self {
        Self::UndefinedVariable {
            name: name.to_string(),
        }
    }

    pub fn invalid_expression(expression: &str, reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> Code {
        match self {
            ParseError::UndefinedVariable { .. } => codes::parse::UNDEFINED_VARIABLE,
            ParseError::InvalidExpression { .. } => codes::parse::INVALID_EXPRESSION,
            ParseError::InvalidPattern { .. } => codes::parse::INVALID_PATTERN,
            ParseError::File(error) => error.error_code(),
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}
