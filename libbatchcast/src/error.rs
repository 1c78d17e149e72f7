//! Error types for Batchcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BatchcastError>;

#[derive(Error, Debug)]
pub enum BatchcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl BatchcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BatchcastError::InvalidInput(_) => 3,
            BatchcastError::Config(_) => 2,
            BatchcastError::Import(_) => 1,
            BatchcastError::Serialization(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Per-file import failures
///
/// The display strings are shown to the user as-is in import reports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("No valid data found")]
    NoValidData,

    #[error("Failed to process file: {0}")]
    Processing(String),
}
