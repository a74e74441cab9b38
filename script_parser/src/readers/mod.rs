//! Value readers built on the parser core
//!
//! Handlers call these right after their key was matched. Every reader
//! accepts an optional leading `=`.

pub mod captured;
pub mod ignore;
pub mod lists;
pub mod scalars;

pub use captured::{assignments, blob_list, string_of_item, Assignments, BlobList, StringOfItem};
pub use ignore::{ignore_item, ignore_object, ignore_string};
pub use lists::{get_doubles, get_ints, get_longs, get_strings};
pub use scalars::{get_double, get_int, get_long, get_string, get_ulong};
