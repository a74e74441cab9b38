//! Rule dispatch and the stream parser driver

mod error;
mod parser;
pub mod rules;

pub use error::{ParseError, ParseResult};
pub use parser::Parser;
pub use rules::{Handler, Matcher, Rule, RuleSet};
