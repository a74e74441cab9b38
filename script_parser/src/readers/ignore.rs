//! Skipping values a caller is not interested in
//!
//! These work on raw lexemes so that skipped content is never resolved
//! against the variable table.

use crate::lexical::next_lexeme;
use crate::source::CharSource;

/// Colour-space prefixes that precede a `{ ... }` component block
const COLOUR_PREFIXES: &[&str] = &["rgb", "hsv", "hsv360"];

/// Next raw lexeme, skipping one leading `=`
pub(crate) fn next_value_lexeme(source: &mut CharSource) -> Option<String> {
    match next_lexeme(source) {
        Some(lexeme) if lexeme == "=" => next_lexeme(source),
        other => other,
    }
}

/// Skip the rest of a block whose `{` was already consumed
pub(crate) fn skip_open_block(source: &mut CharSource) {
    let mut depth = 1usize;
    while let Some(lexeme) = next_lexeme(source) {
        match lexeme.as_str() {
            "{" => depth += 1,
            "}" => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Skip one value: a scalar, a block, or a colour such as `rgb { 1 2 3 }`
pub fn ignore_item(source: &mut CharSource) {
    let Some(value) = next_value_lexeme(source) else {
        return;
    };
    if value == "{" {
        skip_open_block(source);
        return;
    }
    if COLOUR_PREFIXES.contains(&value.as_str()) {
        match next_lexeme(source) {
            Some(open) if open == "{" => skip_open_block(source),
            Some(other) => {
                source.push_back(' ');
                source.push_back_str(&other);
            }
            None => {}
        }
    }
}

/// Skip lexemes until the first block that opens closes again
pub fn ignore_object(source: &mut CharSource) {
    let mut depth = 0usize;
    while let Some(lexeme) = next_lexeme(source) {
        match lexeme.as_str() {
            "{" => depth += 1,
            "}" => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Skip one scalar value
pub fn ignore_string(source: &mut CharSource) {
    next_value_lexeme(source);
}
