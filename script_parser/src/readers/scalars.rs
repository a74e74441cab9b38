//! Single-value readers
//!
//! Each reader skips an optional leading `=` and reads one resolved token.
//! A token that does not convert logs a warning and yields zero.

use crate::expression::next_resolved_token;
use crate::logging::codes;
use crate::log_warning;
use crate::regexes::remove_quotes;
use crate::source::CharSource;
use crate::syntax::ParseResult;
use std::str::FromStr;

/// Next resolved token, skipping one leading `=`
pub(crate) fn next_value_token(source: &mut CharSource) -> ParseResult<Option<String>> {
    match next_resolved_token(source)? {
        Some(token) if token == "=" => next_resolved_token(source),
        other => Ok(other),
    }
}

/// Convert a token, logging and defaulting on failure
pub(crate) fn convert<T>(source: &CharSource, token: &str, target: &str) -> T
where
    T: FromStr + Default,
{
    match parse_number(token) {
        Some(value) => value,
        None => {
            log_warning!(source.logger(), codes::parse::NUMERIC_CONVERSION_FAILED,
                "Could not convert token to a number",
                position = source.position(),
                "token" => token,
                "target" => target);
            T::default()
        }
    }
}

/// Parse an optionally quoted number without logging
pub(crate) fn parse_number<T: FromStr>(token: &str) -> Option<T> {
    remove_quotes(token).trim().parse().ok()
}

/// Read a string value with surrounding quotes removed
pub fn get_string(source: &mut CharSource) -> ParseResult<String> {
    Ok(next_value_token(source)?
        .map(|token| remove_quotes(&token).to_string())
        .unwrap_or_default())
}

fn get_number<T>(source: &mut CharSource, target: &str) -> ParseResult<T>
where
    T: FromStr + Default,
{
    let token = next_value_token(source)?.unwrap_or_default();
    Ok(convert(source, &token, target))
}

pub fn get_int(source: &mut CharSource) -> ParseResult<i32> {
    get_number(source, "int")
}

pub fn get_long(source: &mut CharSource) -> ParseResult<i64> {
    get_number(source, "long")
}

pub fn get_ulong(source: &mut CharSource) -> ParseResult<u64> {
    get_number(source, "unsigned long")
}

pub fn get_double(source: &mut CharSource) -> ParseResult<f64> {
    get_number(source, "double")
}
