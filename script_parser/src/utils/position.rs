//! Source location tracking for the script parser
//!
//! The character source advances a [`Position`] for every character it pulls
//! from the underlying stream so that warnings can point at the line where
//! recovery kicked in.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and character offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Characters consumed from the start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    /// Create a new position
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create the starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            '\t' => Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 4 - ((self.column - 1) % 4),
            },
            _ => Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance position by a string
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let pos = Position::start();
        assert_eq!(pos.offset, 0);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
    }

    #[test]
    fn test_advance_newline_resets_column() {
        let pos = Position::start().advance_str("ab\nc");
        assert_eq!(pos.offset, 4);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn test_advance_tab_to_next_stop() {
        let pos = Position::start().advance('a').advance('\t');
        assert_eq!(pos.column, 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(10, 3, 7).to_string(), "3:7");
    }
}
