//! File processor implementation with compile-time size limits

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::{codes, Logger};
use crate::source::CharSource;
use crate::{log_debug, log_error};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(error: &std::io::Error, path: &Path) -> Self {
        match error.kind() {
            ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            },
            ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => FileProcessorError::IoError {
                message: format!("{}: {}", path.display(), error),
            },
        }
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    /// Get file size in human-readable format
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Check if file is large by the compile-time threshold
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

/// File contents with metadata
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// File contents as UTF-8 text
    pub text: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Opens files for parsing. Size limits are compile-time constants; the
/// remaining behavior comes from runtime preferences.
#[derive(Debug, Clone)]
pub struct FileProcessor {
    /// Remove a leading byte order mark before handing out a source
    pub strip_byte_order_mark: bool,
    /// Log size and timing for every file read
    pub log_file_metrics: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            strip_byte_order_mark: prefs.strip_byte_order_mark,
            log_file_metrics: prefs.log_file_metrics,
        }
    }

    pub fn with_byte_order_mark_stripping(mut self, enabled: bool) -> Self {
        self.strip_byte_order_mark = enabled;
        self
    }

    pub fn with_file_metrics(mut self, enabled: bool) -> Self {
        self.log_file_metrics = enabled;
        self
    }

    /// Get the compile-time maximum file size
    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Get the compile-time large file threshold
    pub fn large_file_threshold() -> u64 {
        LARGE_FILE_THRESHOLD
    }

    /// Read and validate a file. Errors are logged before they are returned.
    pub fn process_file(
        &self,
        path: &Path,
        logger: &Arc<dyn Logger>,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();

        let result = self
            .validate_path(path)
            .and_then(|path| self.get_metadata(&path))
            .and_then(|metadata| self.validate_size(&metadata).map(|_| metadata))
            .and_then(|metadata| {
                let text = self.read_text(&metadata.path)?;
                Ok(FileProcessingResult {
                    text,
                    metadata,
                    processing_duration: start_time.elapsed(),
                })
            });

        match &result {
            Ok(processed) => self.log_processing_success(processed, logger),
            Err(error) => {
                log_error!(logger, error.error_code(), "Failed to open file for parsing",
                    "path" => path.display(),
                    "error" => error);
            }
        }

        result
    }

    /// Open a file as a character source carrying `logger`
    pub fn open_source(
        &self,
        path: &Path,
        logger: Arc<dyn Logger>,
    ) -> Result<CharSource, FileProcessorError> {
        let processed = self.process_file(path, &logger)?;
        let mut source = CharSource::from_text_with_logger(&processed.text, logger);
        if self.strip_byte_order_mark && source.strip_byte_order_mark() {
            log_debug!(source.logger(), "Stripped byte order mark",
                "path" => path.display());
        }
        Ok(source)
    }

    fn log_processing_success(&self, result: &FileProcessingResult, logger: &Arc<dyn Logger>) {
        if !self.log_file_metrics {
            return;
        }
        log_debug!(logger, "File read",
            "path" => result.metadata.path.display(),
            "size_human" => result.metadata.human_readable_size(),
            "chars" => result.char_count(),
            "is_large_file" => result.metadata.is_large_file(),
            "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0));
    }

    fn validate_path(&self, path: &Path) -> Result<PathBuf, FileProcessorError> {
        if path.as_os_str().is_empty() {
            return Err(FileProcessorError::InvalidPath {
                path: String::new(),
            });
        }

        if !path.exists() {
            return Err(FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        if !path.is_file() {
            return Err(FileProcessorError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        path.canonicalize()
            .map_err(|e| FileProcessorError::from_io(&e, path))
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| FileProcessorError::from_io(&e, path))?;
        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    fn validate_size(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }
        Ok(())
    }

    fn read_text(&self, path: &Path) -> Result<String, FileProcessorError> {
        let bytes = fs::read(path).map_err(|e| FileProcessorError::from_io(&e, path))?;
        String::from_utf8(bytes).map_err(|_| FileProcessorError::InvalidEncoding {
            path: path.display().to_string(),
        })
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn memory_logger() -> (Arc<MemoryLogger>, Arc<dyn Logger>) {
        let memory = Arc::new(MemoryLogger::new());
        let logger: Arc<dyn Logger> = memory.clone();
        (memory, logger)
    }

    #[test]
    fn test_open_source_strips_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        fs::write(&path, "\u{FEFF}key = value").unwrap();

        let (_, logger) = memory_logger();
        let processor = FileProcessor::new().with_byte_order_mark_stripping(true);
        let mut source = processor.open_source(&path, logger).unwrap();
        assert_eq!(source.read_to_end(), "key = value");
    }

    #[test]
    fn test_bom_kept_when_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        fs::write(&path, "\u{FEFF}x").unwrap();

        let (_, logger) = memory_logger();
        let processor = FileProcessor::new().with_byte_order_mark_stripping(false);
        let mut source = processor.open_source(&path, logger).unwrap();
        assert_eq!(source.read(), Some('\u{FEFF}'));
    }

    #[test]
    fn test_empty_file_is_valid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let (_, logger) = memory_logger();
        let mut source = FileProcessor::new().open_source(&path, logger).unwrap();
        assert!(source.at_end());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let (memory, logger) = memory_logger();
        let result = FileProcessor::new().process_file(&dir.path().join("nope.txt"), &logger);
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
        assert!(memory.has_event_with_code(codes::file_processing::FILE_NOT_FOUND));
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let (_, logger) = memory_logger();
        let result = FileProcessor::new().process_file(dir.path(), &logger);
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [b'k', b'=', 0xE9, 0xFF]).unwrap();

        let (memory, logger) = memory_logger();
        let result = FileProcessor::new().process_file(&path, &logger);
        assert_matches!(result, Err(FileProcessorError::InvalidEncoding { .. }));
        assert!(memory.has_event_with_code(codes::file_processing::INVALID_ENCODING));
    }

    #[test]
    fn test_metrics_logged_when_enabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.txt");
        fs::write(&path, "a = b").unwrap();

        let (memory, logger) = memory_logger();
        let processor = FileProcessor::new().with_file_metrics(true);
        let result = processor.process_file(&path, &logger).unwrap();
        assert_eq!(result.metadata.size, 5);
        assert_eq!(result.metadata.human_readable_size(), "5 B");
        assert!(!result.metadata.is_large_file());
        assert_eq!(memory.event_count(), 1);
    }

    #[test]
    fn test_error_helpers() {
        let error = FileProcessorError::FileNotFound {
            path: "test.txt".to_string(),
        };
        assert_eq!(error.error_code().as_str(), "E005");
        assert_eq!(error.category(), "FileProcessing");
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_compile_time_limits() {
        assert_eq!(FileProcessor::max_file_size(), MAX_FILE_SIZE);
        assert!(FileProcessor::large_file_threshold() <= FileProcessor::max_file_size());
    }
}
