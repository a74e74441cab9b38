//! Shared primitive types used by the character source, the scanner and logging.

pub mod position;

pub use position::Position;
