//! Lexical analysis: raw lexemes from a character source

pub mod scanner;

pub use scanner::{is_structural, next_lexeme};
