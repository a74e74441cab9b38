//! File-opening collaborator for the parser
//!
//! Turns a path into a [`CharSource`](crate::source::CharSource): validates
//! the path and size, decodes UTF-8 and strips a byte order mark.

mod processor;

use crate::config::runtime::FileProcessorPreferences;
use crate::logging::Logger;
use crate::source::CharSource;
use std::path::Path;
use std::sync::Arc;

pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

/// Open a file with default preferences
pub fn open_source<P: AsRef<Path>>(
    path: P,
    logger: Arc<dyn Logger>,
) -> Result<CharSource, FileProcessorError> {
    FileProcessor::new().open_source(path.as_ref(), logger)
}

/// Create a file processor from runtime preferences structure
pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

/// Get the compile-time maximum file size limit
pub fn get_max_file_size() -> u64 {
    FileProcessor::max_file_size()
}
