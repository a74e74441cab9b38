//! Stream parser driver
//!
//! Pulls lexemes from a [`CharSource`], dispatches them to the registered
//! rules and tracks brace depth to know when the current object ends.
//! Handlers typically build another `Parser` and drive it over the same
//! source to read a nested object.

use crate::config::runtime::{FileProcessorPreferences, RuntimeConfig};
use crate::expression::{next_resolved_token, resolve};
use crate::file_processor::FileProcessor;
use crate::lexical::next_lexeme;
use crate::logging::{codes, create_configured_logger, default_logger, Logger};
use crate::regexes;
use crate::source::{CharSource, VariableTable};
use crate::syntax::rules::{Handler, Matcher, Rule, RuleSet};
use crate::syntax::{ParseError, ParseResult};
use crate::{log_debug, log_info, log_warning};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectKeyOrClose,
    ExpectValue,
}

pub struct Parser<'a> {
    rules: RuleSet<'a>,
    logger: Arc<dyn Logger>,
    file_preferences: FileProcessorPreferences,
}

impl std::fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Parser<'a> {
    /// Parser using the logger selected by the runtime preferences
    pub fn new() -> Self {
        Self::with_logger(default_logger())
    }

    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self {
            rules: RuleSet::new(),
            logger,
            file_preferences: FileProcessorPreferences::default(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            rules: RuleSet::new(),
            logger: create_configured_logger(&config.logging),
            file_preferences: config.file_processor.clone(),
        }
    }

    pub fn with_file_preferences(mut self, preferences: FileProcessorPreferences) -> Self {
        self.file_preferences = preferences;
        self
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    // ========================================================================
    // RULE REGISTRATION
    // ========================================================================

    pub fn register_keyword<F>(&mut self, keyword: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut(&mut CharSource) -> ParseResult<()> + 'a,
    {
        self.rules.push(Rule::new(
            Matcher::keyword(keyword),
            Handler::Source(Box::new(handler)),
        ));
        self
    }

    /// Keyword rule whose handler also receives the token as written
    pub fn register_keyword_keyed<F>(&mut self, keyword: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut(&str, &mut CharSource) -> ParseResult<()> + 'a,
    {
        self.rules.push(Rule::new(
            Matcher::keyword(keyword),
            Handler::Keyed(Box::new(handler)),
        ));
        self
    }

    /// Register a rule for tokens fully matching `pattern`
    pub fn register_regex<F>(&mut self, pattern: &str, handler: F) -> ParseResult<&mut Self>
    where
        F: FnMut(&mut CharSource) -> ParseResult<()> + 'a,
    {
        let matcher = self.compile(pattern)?;
        self.rules
            .push(Rule::new(matcher, Handler::Source(Box::new(handler))));
        Ok(self)
    }

    pub fn register_regex_keyed<F>(&mut self, pattern: &str, handler: F) -> ParseResult<&mut Self>
    where
        F: FnMut(&str, &mut CharSource) -> ParseResult<()> + 'a,
    {
        let matcher = self.compile(pattern)?;
        self.rules
            .push(Rule::new(matcher, Handler::Keyed(Box::new(handler))));
        Ok(self)
    }

    pub fn register_compiled_regex<F>(&mut self, regex: &Regex, handler: F) -> ParseResult<&mut Self>
    where
        F: FnMut(&mut CharSource) -> ParseResult<()> + 'a,
    {
        self.register_regex(regex.as_str(), handler)
    }

    pub fn register_compiled_regex_keyed<F>(
        &mut self,
        regex: &Regex,
        handler: F,
    ) -> ParseResult<&mut Self>
    where
        F: FnMut(&str, &mut CharSource) -> ParseResult<()> + 'a,
    {
        self.register_regex_keyed(regex.as_str(), handler)
    }

    /// Remove every user rule. Variable assignment keeps working.
    pub fn clear_registered_rules(&mut self) {
        self.rules.clear();
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn compile(&self, pattern: &str) -> ParseResult<Matcher> {
        Matcher::pattern(pattern).inspect_err(|error| {
            log_warning!(self.logger, error.error_code(), "Rejected rule pattern",
                "pattern" => pattern,
                "error" => error);
        })
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    /// Next token that no rule claimed, already resolved against the
    /// variable table. Claimed tokens are consumed by their handlers.
    pub fn get_next_token(&mut self, source: &mut CharSource) -> ParseResult<Option<String>> {
        while let Some(lexeme) = next_lexeme(source) {
            if self.rules.dispatch(&lexeme, &lexeme, source)? {
                continue;
            }
            if regexes::is_quoted(&lexeme) {
                let unquoted = regexes::remove_quotes(&lexeme);
                if self.rules.dispatch(unquoted, &lexeme, source)? {
                    continue;
                }
            }
            if assign_variable(&lexeme, source)? {
                continue;
            }
            return resolve(&lexeme, source.variables()).map(Some);
        }
        Ok(None)
    }

    // ========================================================================
    // DRIVER
    // ========================================================================

    /// Parse one object from the source.
    ///
    /// Returns when the brace opened by this object closes, at end of input,
    /// or after skipping a malformed object. Only handler errors and
    /// resolver failures are returned as `Err`.
    pub fn parse_stream(&mut self, source: &mut CharSource) -> ParseResult<()> {
        let mut depth: usize = 0;
        let mut state = State::ExpectKeyOrClose;
        let mut tokens_so_far = String::new();

        while let Some(token) = self.get_next_token(source)? {
            tokens_so_far.push_str(&token);
            match token.as_str() {
                "=" => match state {
                    State::ExpectKeyOrClose => state = State::ExpectValue,
                    State::ExpectValue => {
                        fast_forward(source, depth, &tokens_so_far);
                        return Ok(());
                    }
                },
                "{" => depth += 1,
                "}" => {
                    if depth == 0 {
                        log_debug!(source.logger(), "Ignoring unmatched closing brace",
                            position = source.position());
                        continue;
                    }
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Open and parse a file, returning the variables it defined.
    ///
    /// A file that cannot be opened is logged and treated as empty.
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> ParseResult<VariableTable> {
        let path = path.as_ref();
        let mut source = match self.open(path) {
            Ok(source) => source,
            Err(ParseError::File(error)) => {
                log_debug!(self.logger, "Treating unreadable file as empty",
                    "path" => path.display(),
                    "code" => error.error_code());
                return Ok(VariableTable::new());
            }
            Err(other) => return Err(other),
        };

        self.parse_stream(&mut source)?;

        log_info!(self.logger, codes::success::FILE_PARSED, "File parsed",
            "path" => path.display(),
            "variables" => source.variables().len());

        Ok(source.into_variables())
    }

    fn open(&self, path: &Path) -> ParseResult<CharSource> {
        let processor = FileProcessor::from_preferences(&self.file_preferences);
        Ok(processor.open_source(path, self.logger.clone())?)
    }
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builtin rule for `@name = value`. Returns whether the token was claimed.
fn assign_variable(token: &str, source: &mut CharSource) -> ParseResult<bool> {
    if !regexes::variable().is_match(token) {
        return Ok(false);
    }
    let name = &token[1..];

    match next_lexeme(source) {
        Some(equals) if equals == "=" => {}
        Some(other) => {
            source.push_back(' ');
            source.push_back_str(&other);
            log_warning!(source.logger(), codes::parse::UNEXPECTED_TOKEN,
                "Variable name not followed by '='",
                position = source.position(),
                "variable" => token,
                "found" => other);
            return Ok(true);
        }
        None => {
            log_warning!(source.logger(), codes::parse::UNEXPECTED_TOKEN,
                "Variable name at end of input",
                "variable" => token);
            return Ok(true);
        }
    }

    match next_resolved_token(source)? {
        Some(value) if value.len() == 1 && value.chars().all(crate::lexical::is_structural) => {
            source.push_back_str(&value);
            log_warning!(source.logger(), codes::parse::UNEXPECTED_TOKEN,
                "Variable assigned a non-scalar value",
                position = source.position(),
                "variable" => token,
                "found" => value);
        }
        Some(value) => source.variables_mut().assign(name, &value),
        None => {
            log_warning!(source.logger(), codes::parse::UNEXPECTED_TOKEN,
                "Variable assignment missing its value",
                "variable" => token);
        }
    }
    Ok(true)
}

/// Skip raw characters until the brace depth returns to zero
fn fast_forward(source: &mut CharSource, mut depth: usize, tokens_so_far: &str) {
    let mut skipped = String::new();
    while depth > 0 {
        match source.read() {
            Some('{') => depth += 1,
            Some('}') => depth -= 1,
            Some(ch) if !ch.is_whitespace() => skipped.push(ch),
            Some(_) => {}
            None => break,
        }
    }

    log_warning!(source.logger(), codes::parse::BROKEN_TOKEN_SYNTAX, "Broken token syntax",
        position = source.position(),
        "tokens" => tokens_so_far,
        "skipped" => skipped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;
    use crate::readers;
    use crate::source::Value;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    fn setup(text: &str) -> (CharSource, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        let source = CharSource::from_text_with_logger(text, logger.clone());
        (source, logger)
    }

    #[test]
    fn test_keyword_handler_reads_value() {
        let (mut source, _) = setup("key = value");
        let mut value = String::new();
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("key", |s| {
            value = readers::get_string(s)?;
            Ok(())
        });
        parser.parse_stream(&mut source).unwrap();
        drop(parser);
        assert_eq!(value, "value");
    }

    #[test]
    fn test_quoted_key_falls_back_to_unquoted_rule() {
        let (mut source, _) = setup("\"key\" = value");
        let mut seen = Vec::new();
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword_keyed("key", |token, s| {
            seen.push((token.to_string(), readers::get_string(s)?));
            Ok(())
        });
        parser.parse_stream(&mut source).unwrap();
        drop(parser);
        assert_eq!(seen, vec![("\"key\"".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_quoted_rule_only_matches_quoted_token() {
        let (mut source, _) = setup("key = 1 \"key\" = 2");
        let mut values = Vec::new();
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("\"key\"", |s| {
            values.push(readers::get_int(s)?);
            Ok(())
        });
        parser.parse_stream(&mut source).unwrap();
        drop(parser);
        assert_eq!(values, vec![2]);
    }

    #[test]
    fn test_variables_and_expressions() {
        let (mut source, _) = setup("a=1 @v=2 b=@[v+3]");
        let mut a = 0;
        let mut b = 0;
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("a", |s| {
            a = readers::get_int(s)?;
            Ok(())
        });
        parser.register_keyword("b", |s| {
            b = readers::get_int(s)?;
            Ok(())
        });
        parser.parse_stream(&mut source).unwrap();
        drop(parser);

        assert_eq!(a, 1);
        assert_eq!(b, 5);
        assert_eq!(source.variables().get("v"), Some(&Value::Int(2)));
        assert_eq!(resolve("@[v+3]", source.variables()).unwrap(), "5");
    }

    #[test]
    fn test_variable_value_types() {
        let (mut source, _) = setup("@i = 3 @f = 2.5 @s = word @q = \"two words\"");
        Parser::with_logger(source.logger().clone())
            .parse_stream(&mut source)
            .unwrap();
        let vars = source.variables();
        assert_eq!(vars.get("i"), Some(&Value::Int(3)));
        assert_eq!(vars.get("f"), Some(&Value::Float(2.5)));
        assert_eq!(vars.get("s"), Some(&Value::Str("word".into())));
        assert_eq!(vars.get("q"), Some(&Value::Str("\"two words\"".into())));
    }

    #[test]
    fn test_assignment_survives_clearing_rules() {
        let (mut source, _) = setup("@x = 7");
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("unused", |_| Ok(()));
        parser.clear_registered_rules();
        assert_eq!(parser.rule_count(), 0);
        parser.parse_stream(&mut source).unwrap();
        assert_eq!(source.variables().get("x"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_variable_without_equals_is_pushed_back() {
        let (mut source, logger) = setup("@x key = 1");
        let mut hit = 0;
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("key", |s| {
            hit = readers::get_int(s)?;
            Ok(())
        });
        parser.parse_stream(&mut source).unwrap();
        drop(parser);
        assert_eq!(hit, 1);
        assert!(source.variables().is_empty());
        assert!(logger.has_event_with_code(codes::parse::UNEXPECTED_TOKEN));
    }

    #[test]
    fn test_undefined_variable_is_fatal() {
        let (mut source, _) = setup("key = @missing");
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("key", |s| readers::get_int(s).map(|_| ()));
        assert_matches!(
            parser.parse_stream(&mut source),
            Err(ParseError::UndefinedVariable { name }) if name == "missing"
        );
    }

    #[test]
    fn test_stray_equals_fast_forwards() {
        let (mut source, logger) = setup("key = { k = v = { broken } } after = 1");
        let broken_hits = RefCell::new(0);
        let mut after = 0;

        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("key", |s| {
            let mut inner = Parser::with_logger(s.logger().clone());
            inner.register_keyword("broken", |_| {
                *broken_hits.borrow_mut() += 1;
                Ok(())
            });
            inner.parse_stream(s)
        });
        parser.register_keyword("after", |s| {
            after = readers::get_int(s)?;
            Ok(())
        });
        parser.parse_stream(&mut source).unwrap();
        drop(parser);

        assert_eq!(*broken_hits.borrow(), 0);
        assert_eq!(after, 1);
        let warnings = logger.get_events_with_code(codes::parse::BROKEN_TOKEN_SYNTAX);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].context.get("skipped"), Some(&"v=broken".to_string()));
    }

    #[test]
    fn test_unregistered_keys_fast_forward_without_rules() {
        let (mut source, logger) = setup("key = { k = v = { broken } }");
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.parse_stream(&mut source).unwrap();
        assert!(source.at_end());
        assert!(logger.has_event_with_code(codes::parse::BROKEN_TOKEN_SYNTAX));
    }

    #[test]
    fn test_unterminated_block_still_dispatches() {
        let (mut source, logger) = setup("key = { sub = 1");
        let sub = RefCell::new(None);

        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("key", |s| {
            let mut inner = Parser::with_logger(s.logger().clone());
            inner.register_keyword("sub", |s| {
                *sub.borrow_mut() = Some(readers::get_int(s)?);
                Ok(())
            });
            inner.parse_stream(s)
        });
        assert!(parser.parse_stream(&mut source).is_ok());
        drop(parser);

        assert_eq!(*sub.borrow(), Some(1));
        assert!(logger.get_warnings().is_empty());
    }

    #[test]
    fn test_nested_parse_stops_at_closing_brace() {
        let (mut source, _) = setup("outer = { inner = 1 } next = 2");
        let mut order = Vec::new();
        {
            let order = RefCell::new(&mut order);
            let mut parser = Parser::with_logger(source.logger().clone());
            parser.register_keyword("outer", |s| {
                let mut nested = Parser::with_logger(s.logger().clone());
                nested.register_keyword("inner", |s| {
                    order.borrow_mut().push(format!("inner={}", readers::get_int(s)?));
                    Ok(())
                });
                nested.parse_stream(s)?;
                order.borrow_mut().push("outer done".to_string());
                Ok(())
            });
            parser.register_keyword("next", |s| {
                order.borrow_mut().push(format!("next={}", readers::get_int(s)?));
                Ok(())
            });
            parser.parse_stream(&mut source).unwrap();
        }
        assert_eq!(order, vec!["inner=1", "outer done", "next=2"]);
    }

    #[test]
    fn test_regex_rules() {
        let (mut source, _) = setup("1444.11.11 = yes other = no");
        let mut dates = Vec::new();
        let mut parser = Parser::with_logger(source.logger().clone());
        parser
            .register_regex_keyed(regexes::DATE, |date, s| {
                dates.push(date.to_string());
                readers::ignore_item(s);
                Ok(())
            })
            .unwrap();
        parser.parse_stream(&mut source).unwrap();
        drop(parser);
        assert_eq!(dates, vec!["1444.11.11"]);
    }

    #[test]
    fn test_compiled_regex_must_match_whole_token() {
        let (mut source, _) = setup("abc1 = 1 abc = 2");
        let mut keys = Vec::new();
        let regex = Regex::new("[a-z]+").unwrap();
        let mut parser = Parser::with_logger(source.logger().clone());
        parser
            .register_compiled_regex_keyed(&regex, |key, s| {
                keys.push(key.to_string());
                readers::ignore_item(s);
                Ok(())
            })
            .unwrap();
        parser.parse_stream(&mut source).unwrap();
        drop(parser);
        assert_eq!(keys, vec!["abc"]);
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let logger = Arc::new(MemoryLogger::new());
        let mut parser = Parser::with_logger(logger.clone());
        assert_matches!(
            parser.register_regex("[unclosed", |_| Ok(())),
            Err(ParseError::InvalidPattern { .. })
        );
        assert_eq!(parser.rule_count(), 0);
        assert!(logger.has_event_with_code(codes::parse::INVALID_PATTERN));
    }

    #[test]
    fn test_handler_error_stops_parse() {
        let (mut source, _) = setup("first = 1 second = 2");
        let mut second_seen = false;
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("first", |_| {
            Err(ParseError::invalid_expression("first", "rejected by handler"))
        });
        parser.register_keyword("second", |_| {
            second_seen = true;
            Ok(())
        });
        assert!(parser.parse_stream(&mut source).is_err());
        drop(parser);
        assert!(!second_seen);
    }

    #[test]
    fn test_get_next_token_skips_claimed_tokens() {
        let (mut source, _) = setup("claimed bare @[1+1]");
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("claimed", |_| Ok(()));
        assert_eq!(parser.get_next_token(&mut source).unwrap().as_deref(), Some("bare"));
        assert_eq!(parser.get_next_token(&mut source).unwrap().as_deref(), Some("2"));
        assert_eq!(parser.get_next_token(&mut source).unwrap(), None);
    }

    #[test]
    fn test_stray_closing_brace_at_top_level() {
        let (mut source, _) = setup("} key = 3");
        let mut value = 0;
        let mut parser = Parser::with_logger(source.logger().clone());
        parser.register_keyword("key", |s| {
            value = readers::get_int(s)?;
            Ok(())
        });
        parser.parse_stream(&mut source).unwrap();
        drop(parser);
        assert_eq!(value, 3);
    }

    #[test]
    fn test_parse_file_returns_variables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("values.txt");
        fs::write(&path, "\u{FEFF}@scale = 4\nsize = @[scale*2]\n").unwrap();

        let logger = Arc::new(MemoryLogger::new());
        let mut size = 0;
        let mut parser = Parser::with_logger(logger.clone());
        parser.register_keyword("size", |s| {
            size = readers::get_int(s)?;
            Ok(())
        });
        let variables = parser.parse_file(&path).unwrap();
        drop(parser);

        assert_eq!(size, 8);
        assert_eq!(variables.get("scale"), Some(&Value::Int(4)));
        assert!(logger.has_event_with_code(codes::success::FILE_PARSED));
    }

    #[test]
    fn test_parse_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let logger = Arc::new(MemoryLogger::new());
        let mut parser = Parser::with_logger(logger.clone());
        let variables = parser.parse_file(dir.path().join("absent.txt")).unwrap();
        assert!(variables.is_empty());
        assert!(logger.has_event_with_code(codes::file_processing::FILE_NOT_FOUND));
        assert!(!logger.get_errors().is_empty());
    }
}
