//! Lexeme scanner
//!
//! Produces one uninterpreted lexeme per call. Quoted strings keep their
//! quotes, raw literals `R"(...)"` come back as an ordinary quoted string,
//! and the structural characters `{`, `}` and `=` are always lexemes of
//! their own.

use crate::source::CharSource;

/// Characters that are always single-character lexemes outside quotes
pub fn is_structural(ch: char) -> bool {
    matches!(ch, '{' | '}' | '=')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Plain,
    Quoted,
    RawLiteral,
}

/// Scan the next lexeme. Returns `None` once the input holds nothing but
/// whitespace and comments.
pub fn next_lexeme(source: &mut CharSource) -> Option<String> {
    let mut lexeme = String::new();
    let mut mode = Mode::Plain;
    let mut previous: Option<char> = None;

    while let Some(ch) = source.read() {
        match mode {
            Mode::RawLiteral => {
                if ch == ')' && source.peek() == Some('"') {
                    source.read();
                    lexeme.push('"');
                    break;
                }
                lexeme.push(ch);
            }
            Mode::Quoted => {
                if ch == '\r' {
                    lexeme.push(' ');
                } else {
                    lexeme.push(ch);
                    if ch == '"' && previous != Some('\\') {
                        break;
                    }
                }
                previous = Some(ch);
            }
            Mode::Plain => {
                if ch == '\r' {
                    if lexeme.is_empty() {
                        continue;
                    }
                    break;
                }
                if ch == '#' {
                    skip_line(source);
                    if lexeme.is_empty() {
                        continue;
                    }
                    break;
                }
                if ch == '"' && lexeme.is_empty() {
                    mode = Mode::Quoted;
                    lexeme.push(ch);
                    previous = Some(ch);
                    continue;
                }
                if ch == '"' && lexeme == "R" {
                    mode = Mode::RawLiteral;
                    lexeme.clear();
                    lexeme.push('"');
                    if source.peek() == Some('(') {
                        source.read();
                    }
                    continue;
                }
                if ch.is_whitespace() {
                    if lexeme.is_empty() {
                        continue;
                    }
                    break;
                }
                if is_structural(ch) {
                    if lexeme.is_empty() {
                        lexeme.push(ch);
                    } else {
                        source.push_back(ch);
                    }
                    break;
                }
                lexeme.push(ch);
            }
        }
    }

    if lexeme.is_empty() {
        None
    } else {
        Some(lexeme)
    }
}

/// Discard everything up to and including the next newline
fn skip_line(source: &mut CharSource) {
    while let Some(ch) = source.read() {
        if ch == '\n' {
            break;
        }
    }
}
