//! Consolidated event codes and classification system
//!
//! Single source of truth for every code the parser emits, together with the
//! metadata used when formatting detailed or structured log output.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

impl CodeMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System codes
pub mod system {
    use super::Code;

    pub const CONFIGURATION_ERROR: Code = Code::new("ERR002");
}

/// File processing codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Stream parsing codes
pub mod parse {
    use super::Code;

    pub const BROKEN_TOKEN_SYNTAX: Code = Code::new("W040");
    pub const NUMERIC_CONVERSION_FAILED: Code = Code::new("W041");
    pub const UNEXPECTED_TOKEN: Code = Code::new("W042");
    pub const UNDEFINED_VARIABLE: Code = Code::new("E060");
    pub const INVALID_EXPRESSION: Code = Code::new("E061");
    pub const INVALID_PATTERN: Code = Code::new("E062");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const FILE_PARSED: Code = Code::new("I006");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const METADATA: &[CodeMetadata] = &[
    CodeMetadata::new(
        "ERR002",
        "System",
        Severity::High,
        false,
        "Configuration could not be loaded",
    ),
    CodeMetadata::new(
        "E005",
        "FileProcessing",
        Severity::Medium,
        true,
        "File not found at specified path",
    ),
    CodeMetadata::new(
        "E007",
        "FileProcessing",
        Severity::Medium,
        true,
        "File exceeds maximum size limit",
    ),
    CodeMetadata::new(
        "E009",
        "FileProcessing",
        Severity::Medium,
        true,
        "Permission denied accessing file",
    ),
    CodeMetadata::new(
        "E010",
        "FileProcessing",
        Severity::Medium,
        true,
        "Invalid UTF-8 encoding in file",
    ),
    CodeMetadata::new(
        "E011",
        "FileProcessing",
        Severity::Medium,
        true,
        "I/O error during file operation",
    ),
    CodeMetadata::new(
        "E012",
        "FileProcessing",
        Severity::Medium,
        true,
        "Invalid file path provided",
    ),
    CodeMetadata::new(
        "W040",
        "Parse",
        Severity::Low,
        true,
        "Stray '=' while a value was expected; input skipped to brace depth 0",
    ),
    CodeMetadata::new(
        "W041",
        "Parse",
        Severity::Low,
        true,
        "Token could not be converted to a number; default used",
    ),
    CodeMetadata::new(
        "W042",
        "Parse",
        Severity::Low,
        true,
        "Token did not match the expected shape",
    ),
    CodeMetadata::new(
        "E060",
        "Parse",
        Severity::High,
        false,
        "Reference to a variable that was never assigned",
    ),
    CodeMetadata::new(
        "E061",
        "Parse",
        Severity::High,
        false,
        "Interpolated expression could not be evaluated",
    ),
    CodeMetadata::new(
        "E062",
        "Parse",
        Severity::High,
        false,
        "Rule pattern is not a valid regular expression",
    ),
    CodeMetadata::new("I006", "FileProcessing", Severity::Low, true, "File parsed"),
];

static REGISTRY: OnceLock<HashMap<&'static str, &'static CodeMetadata>> = OnceLock::new();

fn get_registry() -> &'static HashMap<&'static str, &'static CodeMetadata> {
    REGISTRY.get_or_init(|| METADATA.iter().map(|meta| (meta.code, meta)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_registry().get(code).copied()
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if the condition behind a code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown code")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
