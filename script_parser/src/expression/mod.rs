//! Expression resolver
//!
//! Replaces `@name` references and `@[...]` interpolated expressions with
//! their value from the source's variable table. Every other lexeme passes
//! through untouched.

pub mod evaluator;

pub use evaluator::evaluate;

use crate::lexical::next_lexeme;
use crate::regexes;
use crate::source::{CharSource, VariableTable};
use crate::syntax::{ParseError, ParseResult};

/// Resolve a single lexeme against a variable table
pub fn resolve(lexeme: &str, variables: &VariableTable) -> ParseResult<String> {
    if regexes::interpolated_expression().is_match(lexeme) {
        let body = expression_body(lexeme);
        return Ok(evaluate(body, variables)?.to_string());
    }
    if regexes::variable().is_match(lexeme) {
        let name = &lexeme[1..];
        return variables
            .get(name)
            .map(|value| value.to_string())
            .ok_or_else(|| ParseError::undefined_variable(name));
    }
    Ok(lexeme.to_string())
}

/// Next lexeme with variables and expressions already substituted.
///
/// No rule dispatch happens here; scalar readers use this directly.
pub fn next_resolved_token(source: &mut CharSource) -> ParseResult<Option<String>> {
    match next_lexeme(source) {
        Some(lexeme) => resolve(&lexeme, source.variables()).map(Some),
        None => Ok(None),
    }
}

/// Text between `@[` (or `@\[`) and the closing `]`
fn expression_body(lexeme: &str) -> &str {
    let inner = lexeme.strip_prefix('@').unwrap_or(lexeme);
    let inner = inner.strip_prefix('\\').unwrap_or(inner);
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    inner.strip_suffix(']').unwrap_or(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NullLogger;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn vars() -> VariableTable {
        let mut table = VariableTable::new();
        table.assign("v", "2");
        table.assign("name", "\"quoted\"");
        table
    }

    #[test]
    fn test_plain_lexemes_pass_through() {
        let table = vars();
        assert_eq!(resolve("value", &table).unwrap(), "value");
        assert_eq!(resolve("\"@v\"", &table).unwrap(), "\"@v\"");
        assert_eq!(resolve("=", &table).unwrap(), "=");
    }

    #[test]
    fn test_variable_reference() {
        let table = vars();
        assert_eq!(resolve("@v", &table).unwrap(), "2");
        assert_eq!(resolve("@name", &table).unwrap(), "\"quoted\"");
        assert_matches!(
            resolve("@nope", &table),
            Err(ParseError::UndefinedVariable { name }) if name == "nope"
        );
    }

    #[test]
    fn test_interpolated_expression() {
        let table = vars();
        assert_eq!(resolve("@[v+3]", &table).unwrap(), "5");
        assert_eq!(resolve("@\\[v*2]", &table).unwrap(), "4");
        assert_eq!(resolve("@[v/4]", &table).unwrap(), "0.5");
    }

    #[test]
    fn test_next_resolved_token() {
        let mut source = CharSource::from_text_with_logger("@[v+3] plain", Arc::new(NullLogger));
        source.variables_mut().assign("v", "2");
        assert_eq!(next_resolved_token(&mut source).unwrap().as_deref(), Some("5"));
        assert_eq!(next_resolved_token(&mut source).unwrap().as_deref(), Some("plain"));
        assert_eq!(next_resolved_token(&mut source).unwrap(), None);
    }

    #[test]
    fn test_dotted_variable_in_expression() {
        let mut table = vars();
        table.assign("a.b", "2");
        assert_eq!(resolve("@a.b", &table).unwrap(), "2");
        assert_eq!(resolve("@[a.b*2]", &table).unwrap(), "4");
    }

    #[test]
    fn test_deeply_nested_expression_is_an_error() {
        let table = vars();
        let lexeme = format!("@[{}1{}]", "(".repeat(200_000), ")".repeat(200_000));
        assert_matches!(
            resolve(&lexeme, &table),
            Err(ParseError::InvalidExpression { reason, .. }) if reason == "expression nested too deeply"
        );
    }
}
