//! Error types for contactregister

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for contact register operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid contact: {reason}")]
    InvalidContact { reason: String },

    #[error("Unknown query field: {field}")]
    UnknownQueryField { field: String },

    #[error("Malformed query: {query:?}")]
    MalformedQuery { query: String },

    #[error("File does not exist: {}", path.display())]
    NonexistentFile { path: PathBuf },

    #[error("Contact not found: {key}")]
    ContactNotFound { key: String },

    #[error("Contact id prefix is ambiguous: {key}")]
    AmbiguousId { key: String },

    #[error("Contact already exists: {id}")]
    DuplicateContact { id: String },

    #[error("Invalid list name: {name:?} (use letters, digits, '-' or '_')")]
    InvalidListName { name: String },

    #[error("Unsupported list file version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Export would overwrite the list file: {}", path.display())]
    ExportOverwritesList { path: PathBuf },

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },
}

impl Error {
    pub(crate) fn invalid_contact(reason: impl Into<String>) -> Self {
        Self::InvalidContact {
            reason: reason.into(),
        }
    }
}

/// Result type alias for contact register operations
pub type Result<T> = std::result::Result<T, Error>;
