//! Error types for bkptlist
//!
//! Only a completely unreadable document is an error at load time. Entries
//! the model cannot type are kept as opaque pass-through nodes instead, see
//! [`EntryError`].

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bkptlist
#[derive(Error, Debug)]
pub enum Error {
    // === Document Errors ===
    #[error("Malformed breakpoint list: {0}")]
    MalformedDocument(String),

    #[error("Failed to write XML: {0}")]
    XmlWrite(String),

    // === Breakpoint Errors ===
    #[error("Invalid breakpoint location '{0}'. Expected <file>:<line>, e.g. Sources/App/main.swift:42")]
    InvalidLocation(String),

    #[error("No breakpoints at {file}:{line}. Use 'bkptlist list <file>' to see what is registered")]
    NoBreakpointsAt { file: String, line: u64 },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to write file '{path}': {error}")]
    FileWrite { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    /// Create a file write error
    pub fn file_write(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileWrite {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}

/// Why a single breakpoint proxy could not be read into the typed model
///
/// Never surfaced to callers of `open`; the offending node is kept opaque.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("extension '{0}' is not a file breakpoint")]
    WrongKind(String),

    #[error("missing <{0}> element")]
    MissingContent(&'static str),

    #[error("missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("attribute '{attribute}' is not a non-negative integer: '{value}'")]
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },

    #[error("attribute '{attribute}' must be Yes or No, got '{value}'")]
    InvalidFlag {
        attribute: &'static str,
        value: String,
    },
}
