//! Token classification grammar
//!
//! Each class is exported as a pattern string (for `Parser::register_regex`,
//! which anchors it) and as a compiled, fully-anchored [`Regex`].

use regex::Regex;
use std::sync::OnceLock;

// ============================================================================
// PATTERNS
// ============================================================================

pub const INTEGER: &str = r"-?\d+";
pub const QUOTED_INTEGER: &str = r#""-?\d+""#;
pub const FLOAT: &str = r"-?\d+(\.\d+)?";
pub const QUOTED_FLOAT: &str = r#""-?\d+(\.\d+)?""#;
pub const STRING: &str = r#"[^@\s=\{\}\[\]"][^\s=\{\}\[\]"]*"#;
pub const QUOTED_STRING: &str = r#""[^\n"]+""#;
pub const VARIABLE: &str = r#"@[^\s=\{\}\[\]"]+"#;
pub const INTERPOLATED_EXPRESSION: &str = r"@\\?\[.*\]";
pub const DATE: &str = r"-?\d+(\.\d+)?(\.\d+)?\.?";
pub const CATCHALL: &str = r#""[^\n]*"|[^?=\{\}]+"#;

/// Wrap a pattern so that it must match the whole token
pub fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

// ============================================================================
// COMPILED FORMS
// ============================================================================

macro_rules! compiled {
    ($(#[$meta:meta])* $name:ident => $pattern:expr) => {
        $(#[$meta])*
        pub fn $name() -> &'static Regex {
            static CELL: OnceLock<Regex> = OnceLock::new();
            CELL.get_or_init(|| anchored($pattern).expect("built-in pattern is valid"))
        }
    };
}

compiled!(integer => INTEGER);
compiled!(quoted_integer => QUOTED_INTEGER);
compiled!(float => FLOAT);
compiled!(quoted_float => QUOTED_FLOAT);
compiled!(string => STRING);
compiled!(quoted_string => QUOTED_STRING);
compiled!(
    /// `@name` variable reference
    variable => VARIABLE
);
compiled!(
    /// `@[...]` arithmetic expression
    interpolated_expression => INTERPOLATED_EXPRESSION
);
compiled!(date => DATE);
compiled!(
    /// Generic key acceptor for rules that want every unclaimed key
    catchall => CATCHALL
);

// ============================================================================
// QUOTE HELPERS
// ============================================================================

pub fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

/// Strip one pair of surrounding quotes, if present
pub fn remove_quotes(text: &str) -> &str {
    if is_quoted(text) {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

pub fn add_quotes(text: &str) -> String {
    if is_quoted(text) {
        text.to_string()
    } else {
        format!("\"{}\"", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_classes() {
        assert!(integer().is_match("-42"));
        assert!(!integer().is_match("42a"));
        assert!(quoted_integer().is_match("\"7\""));
        assert!(float().is_match("3.25"));
        assert!(float().is_match("3"));
        assert!(!float().is_match("3."));
        assert!(quoted_float().is_match("\"-0.5\""));
    }

    #[test]
    fn test_patterns_match_whole_token() {
        assert!(!integer().is_match("12 34"));
        assert!(!variable().is_match("x@y"));
        assert!(!quoted_string().is_match("\"a\" b"));
    }

    #[test]
    fn test_string_classes() {
        assert!(string().is_match("some_key"));
        assert!(!string().is_match("@var"));
        assert!(!string().is_match("a=b"));
        assert!(quoted_string().is_match("\"hello world\""));
        assert!(!quoted_string().is_match("\"\""));
    }

    #[test]
    fn test_variable_and_expression() {
        assert!(variable().is_match("@my_var"));
        assert!(!variable().is_match("@[a+b]"));
        assert!(interpolated_expression().is_match("@[a+b]"));
        assert!(interpolated_expression().is_match("@\\[a+b]"));
        assert!(!interpolated_expression().is_match("@a+b"));
    }

    #[test]
    fn test_date_class() {
        assert!(date().is_match("1444.11.11"));
        assert!(date().is_match("-50.1.1."));
        assert!(date().is_match("1836"));
        assert!(!date().is_match("1.2.3.4"));
    }

    #[test]
    fn test_catchall() {
        assert!(catchall().is_match("any_key"));
        assert!(catchall().is_match("\"quoted key\""));
        assert!(!catchall().is_match("="));
        assert!(!catchall().is_match("{"));
        assert!(!catchall().is_match("a?b"));
    }

    #[test]
    fn test_quote_helpers() {
        assert!(is_quoted("\"x\""));
        assert!(!is_quoted("\""));
        assert_eq!(remove_quotes("\"x y\""), "x y");
        assert_eq!(remove_quotes("plain"), "plain");
        assert_eq!(add_quotes("plain"), "\"plain\"");
        assert_eq!(add_quotes("\"q\""), "\"q\"");
    }

    #[test]
    fn test_anchored_rejects_bad_pattern() {
        assert!(anchored("(unclosed").is_err());
    }
}
