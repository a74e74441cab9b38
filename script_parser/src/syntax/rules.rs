//! Rule registry: matchers paired with handlers
//!
//! Rules are tried in registration order and the first match wins.

use crate::regexes;
use crate::source::CharSource;
use crate::syntax::{ParseError, ParseResult};
use regex::Regex;

/// Handler receiving only the source, positioned after the matched token
pub type SourceHandler<'a> = Box<dyn FnMut(&mut CharSource) -> ParseResult<()> + 'a>;

/// Handler receiving the matched token text and the source
pub type KeyedHandler<'a> = Box<dyn FnMut(&str, &mut CharSource) -> ParseResult<()> + 'a>;

pub enum Matcher {
    Keyword(String),
    /// Compiled with anchors so that only whole-token matches count
    Pattern(Regex),
}

impl Matcher {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Matcher::Keyword(keyword.into())
    }

    pub fn pattern(pattern: &str) -> ParseResult<Self> {
        regexes::anchored(pattern)
            .map(Matcher::Pattern)
            .map_err(|e| ParseError::invalid_pattern(pattern, e.to_string()))
    }

    /// Use an already compiled regex, requiring it to cover the whole token
    pub fn compiled(regex: &Regex) -> ParseResult<Self> {
        Self::pattern(regex.as_str())
    }

    pub fn matches(&self, token: &str) -> bool {
        match self {
            Matcher::Keyword(keyword) => keyword == token,
            Matcher::Pattern(regex) => regex.is_match(token),
        }
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Keyword(keyword) => write!(f, "Keyword({:?})", keyword),
            Matcher::Pattern(regex) => write!(f, "Pattern({:?})", regex.as_str()),
        }
    }
}

pub enum Handler<'a> {
    Source(SourceHandler<'a>),
    Keyed(KeyedHandler<'a>),
}

impl<'a> Handler<'a> {
    pub fn call(&mut self, token: &str, source: &mut CharSource) -> ParseResult<()> {
        match self {
            Handler::Source(handler) => handler(source),
            Handler::Keyed(handler) => handler(token, source),
        }
    }
}

pub struct Rule<'a> {
    pub matcher: Matcher,
    pub handler: Handler<'a>,
}

impl<'a> Rule<'a> {
    pub fn new(matcher: Matcher, handler: Handler<'a>) -> Self {
        Self { matcher, handler }
    }
}

/// Ordered rule list, first match wins
#[derive(Default)]
pub struct RuleSet<'a> {
    rules: Vec<Rule<'a>>,
}

impl<'a> RuleSet<'a> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: Rule<'a>) {
        self.rules.push(rule);
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the first rule whose matcher accepts `candidate`, handing it
    /// `token`. Returns whether a rule fired.
    pub fn dispatch(
        &mut self,
        candidate: &str,
        token: &str,
        source: &mut CharSource,
    ) -> ParseResult<bool> {
        match self.rules.iter_mut().find(|rule| rule.matcher.matches(candidate)) {
            Some(rule) => {
                rule.handler.call(token, source)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
