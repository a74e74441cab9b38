//! List readers for `{ a b c }` blocks
//!
//! A bare value instead of a block yields a one-element list. Nested blocks
//! inside the list are skipped. Tokens that do not convert are logged and
//! left out.

use crate::expression::next_resolved_token;
use crate::log_warning;
use crate::logging::codes;
use crate::readers::ignore::skip_open_block;
use crate::readers::scalars::{next_value_token, parse_number};
use crate::regexes::remove_quotes;
use crate::source::CharSource;
use crate::syntax::ParseResult;
use std::str::FromStr;

fn collect_values<T, F>(source: &mut CharSource, mut convert: F) -> ParseResult<Vec<T>>
where
    F: FnMut(&CharSource, &str) -> Option<T>,
{
    let mut values = Vec::new();
    let Some(first) = next_value_token(source)? else {
        return Ok(values);
    };
    if first != "{" {
        values.extend(convert(source, &first));
        return Ok(values);
    }

    while let Some(token) = next_resolved_token(source)? {
        match token.as_str() {
            "}" => break,
            "{" => skip_open_block(source),
            "=" => {}
            _ => values.extend(convert(source, &token)),
        }
    }
    Ok(values)
}

fn collect_numbers<T: FromStr>(source: &mut CharSource, target: &str) -> ParseResult<Vec<T>> {
    collect_values(source, |source, token| {
        let value = parse_number(token);
        if value.is_none() {
            log_warning!(source.logger(), codes::parse::NUMERIC_CONVERSION_FAILED,
                "Skipping non-numeric list entry",
                position = source.position(),
                "token" => token,
                "target" => target);
        }
        value
    })
}

pub fn get_strings(source: &mut CharSource) -> ParseResult<Vec<String>> {
    collect_values(source, |_, token| Some(remove_quotes(token).to_string()))
}

pub fn get_ints(source: &mut CharSource) -> ParseResult<Vec<i32>> {
    collect_numbers(source, "int")
}

pub fn get_longs(source: &mut CharSource) -> ParseResult<Vec<i64>> {
    collect_numbers(source, "long")
}

pub fn get_doubles(source: &mut CharSource) -> ParseResult<Vec<f64>> {
    collect_numbers(source, "double")
}
