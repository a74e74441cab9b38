//! Tolerant parser for brace-structured game data scripts
//!
//! ```text
//! @scale = 2
//! unit = {
//!     name = "Infantry"    # comment
//!     size = @[scale*3]
//! }
//! ```
//!
//! Callers register keyword or regex rules on a [`Parser`]; each handler
//! reads its own value from the shared [`CharSource`], often by driving a
//! nested `Parser` over the same source. Keys without a rule are skipped.

// Internal modules
pub mod config;
pub mod expression;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod readers;
pub mod regexes;
pub mod source;
pub mod syntax;
pub mod utils;

// Re-export key types for library consumers
pub use expression::{next_resolved_token, resolve};
pub use lexical::next_lexeme;
pub use source::{CharSource, Value, VariableTable};
pub use syntax::{ParseError, ParseResult, Parser};

/// Remove a leading byte order mark from `source`
pub fn strip_byte_order_mark(source: &mut CharSource) -> bool {
    source.strip_byte_order_mark()
}
