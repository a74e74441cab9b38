//! Character source with pushback
//!
//! Every read consults the pushback stack first, then the underlying stream.
//! The source also owns the variable table and the logger for one parse, so
//! nested parsers reading from the same source share both.

pub mod variables;

pub use variables::{Value, VariableTable};

use crate::logging::{default_logger, Logger};
use crate::utils::Position;
use std::io::Read;
use std::iter::Peekable;
use std::sync::Arc;

/// UTF-8 byte order mark as decoded text
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

pub struct CharSource {
    chars: Peekable<Box<dyn Iterator<Item = char>>>,
    pushback: Vec<char>,
    variables: VariableTable,
    logger: Arc<dyn Logger>,
    position: Position,
}

impl CharSource {
    /// Wrap an arbitrary character stream
    pub fn new<I>(chars: I, logger: Arc<dyn Logger>) -> Self
    where
        I: Iterator<Item = char> + 'static,
    {
        let boxed: Box<dyn Iterator<Item = char>> = Box::new(chars);
        Self {
            chars: boxed.peekable(),
            pushback: Vec::new(),
            variables: VariableTable::new(),
            logger,
            position: Position::start(),
        }
    }

    /// Source over an in-memory string using the configured default logger
    pub fn from_text(text: &str) -> Self {
        Self::from_text_with_logger(text, default_logger())
    }

    pub fn from_text_with_logger(text: &str, logger: Arc<dyn Logger>) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self::new(chars.into_iter(), logger)
    }

    /// Drain a reader into a source. Invalid UTF-8 is an error.
    pub fn from_reader<R: Read>(mut reader: R, logger: Arc<dyn Logger>) -> std::io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::from_text_with_logger(&text, logger))
    }

    /// Next character, or `None` at end of input
    pub fn read(&mut self) -> Option<char> {
        if let Some(ch) = self.pushback.pop() {
            return Some(ch);
        }
        let ch = self.chars.next()?;
        self.position = self.position.advance(ch);
        Some(ch)
    }

    /// Read up to `count` characters, stopping early at end of input
    pub fn read_n(&mut self, count: usize) -> String {
        let mut result = String::with_capacity(count);
        for _ in 0..count {
            match self.read() {
                Some(ch) => result.push(ch),
                None => break,
            }
        }
        result
    }

    pub fn peek(&mut self) -> Option<char> {
        match self.pushback.last() {
            Some(ch) => Some(*ch),
            None => self.chars.peek().copied(),
        }
    }

    /// True only when the pushback stack is empty and the stream is exhausted
    pub fn at_end(&mut self) -> bool {
        self.pushback.is_empty() && self.chars.peek().is_none()
    }

    pub fn push_back(&mut self, ch: char) {
        self.pushback.push(ch);
    }

    /// Push back a whole string so that it is read again in its original order
    pub fn push_back_str(&mut self, text: &str) {
        for ch in text.chars().rev() {
            self.pushback.push(ch);
        }
    }

    pub fn read_to_end(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.read() {
            result.push(ch);
        }
        result
    }

    /// Remove a leading byte order mark. Returns whether one was found.
    pub fn strip_byte_order_mark(&mut self) -> bool {
        if self.peek() == Some(BYTE_ORDER_MARK) {
            self.read();
            true
        } else {
            false
        }
    }

    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableTable {
        &mut self.variables
    }

    /// Merge another source's variables into this one; theirs win on collision
    pub fn copy_variables_from(&mut self, other: &CharSource) {
        self.variables.copy_from(&other.variables);
    }

    pub fn into_variables(self) -> VariableTable {
        self.variables
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Position of the last character pulled from the underlying stream
    pub fn position(&self) -> Position {
        self.position
    }
}

impl std::fmt::Debug for CharSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharSource")
            .field("pushback", &self.pushback)
            .field("variables", &self.variables)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
