//! Readers that capture literal source text instead of interpreting it

use crate::readers::ignore::next_value_lexeme;
use crate::regexes::{self, remove_quotes};
use crate::source::CharSource;
use crate::syntax::{ParseResult, Parser};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

enum Piece {
    Open,
    Close,
    Char(char),
    Comment(String),
}

/// Character scan that knows about quoted text and `#` line comments, so
/// braces inside either are not counted
#[derive(Default)]
struct LiteralScan {
    in_quotes: bool,
    escaped: bool,
}

impl LiteralScan {
    fn next_piece(&mut self, source: &mut CharSource) -> Option<Piece> {
        let ch = source.read()?;
        if self.in_quotes {
            if ch == '"' && !self.escaped {
                self.in_quotes = false;
            }
            self.escaped = ch == '\\' && !self.escaped;
            return Some(Piece::Char(ch));
        }

        Some(match ch {
            '{' => Piece::Open,
            '}' => Piece::Close,
            '#' => {
                let mut comment = String::from(ch);
                while let Some(next) = source.read() {
                    comment.push(next);
                    if next == '\n' {
                        break;
                    }
                }
                Piece::Comment(comment)
            }
            '"' => {
                self.in_quotes = true;
                self.escaped = false;
                Piece::Char(ch)
            }
            _ => Piece::Char(ch),
        })
    }
}

/// Literal text of one value. Blocks are returned with their braces and
/// inner text exactly as written; the leading `=` is not included.
pub fn string_of_item(source: &mut CharSource) -> String {
    let Some(first) = next_value_lexeme(source) else {
        return String::new();
    };
    if first != "{" {
        return first;
    }

    let mut text = first;
    let mut depth = 1usize;
    let mut scan = LiteralScan::default();
    while let Some(piece) = scan.next_piece(source) {
        match piece {
            Piece::Open => {
                text.push('{');
                depth += 1;
            }
            Piece::Close => {
                text.push('}');
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Piece::Char(ch) => text.push(ch),
            Piece::Comment(comment) => text.push_str(&comment),
        }
    }
    text
}

/// Inner text of each block directly inside one outer block.
///
/// `= { {foo} {bar} }` yields `["foo", "bar"]`; anything at the outer
/// block's own level is dropped.
pub fn blob_list(source: &mut CharSource) -> Vec<String> {
    let mut blobs = Vec::new();
    match next_value_lexeme(source) {
        Some(open) if open == "{" => {}
        _ => return blobs,
    }

    let mut depth = 0usize;
    let mut current = String::new();
    let mut scan = LiteralScan::default();
    while let Some(piece) = scan.next_piece(source) {
        match piece {
            Piece::Open => {
                if depth > 0 {
                    current.push('{');
                }
                depth += 1;
            }
            Piece::Close => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if depth > 0 {
                    current.push('}');
                } else {
                    blobs.push(std::mem::take(&mut current));
                }
            }
            _ if depth == 0 => {}
            Piece::Char(ch) => current.push(ch),
            Piece::Comment(comment) => current.push_str(&comment),
        }
    }
    blobs
}

/// Every `key = value` inside one block, keyed by unquoted key. Scalar values
/// lose their quotes; block values keep their literal text.
pub fn assignments(source: &mut CharSource) -> ParseResult<BTreeMap<String, String>> {
    let mut values = BTreeMap::new();
    let mut parser = Parser::with_logger(source.logger().clone());
    parser.register_compiled_regex_keyed(regexes::catchall(), |key, source| {
        let value = string_of_item(source);
        values.insert(
            remove_quotes(key).to_string(),
            remove_quotes(&value).to_string(),
        );
        Ok(())
    })?;
    parser.parse_stream(source)?;
    drop(parser);
    Ok(values)
}

// ============================================================================
// NEWTYPE WRAPPERS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StringOfItem(String);

impl StringOfItem {
    pub fn parse(source: &mut CharSource) -> Self {
        Self(string_of_item(source))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StringOfItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BlobList(Vec<String>);

impl BlobList {
    pub fn parse(source: &mut CharSource) -> Self {
        Self(blob_list(source))
    }

    pub fn blobs(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Assignments(BTreeMap<String, String>);

impl Assignments {
    pub fn parse(source: &mut CharSource) -> ParseResult<Self> {
        assignments(source).map(Self)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}
