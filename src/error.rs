//! Error types for GNC program handling.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for GNC processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// Output file already exists (-4)
    FileExists = -4,
    /// Part index out of range (E200)
    PartNotFound = 200,
    /// Malformed placement argument (E201)
    InvalidPlacement = 201,
    /// Debug serialization failed (E300)
    Serialization = 300,
}

/// Main error type for GNC file operations.
///
/// Parsing, generation and rendering never fail; only the file and
/// placement helpers surface these.
#[derive(Debug, Error)]
pub enum GncError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("File already exists: {path}")]
    FileExists { path: PathBuf },

    /// `index` is zero-based; the message shows it one-based.
    #[error("Part {} not found (sheet has {} part(s))", .index + 1, .available)]
    PartNotFound { index: usize, available: usize },

    #[error("Invalid placement '{value}': expected X,Y")]
    InvalidPlacement { value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GncError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GncError::FileNotFound { .. } => ErrorCode::FileNotFound,
            GncError::EmptyFile { .. } => ErrorCode::EmptyFile,
            GncError::FileExists { .. } => ErrorCode::FileExists,
            GncError::PartNotFound { .. } => ErrorCode::PartNotFound,
            GncError::InvalidPlacement { .. } => ErrorCode::InvalidPlacement,
            GncError::Io(_) => ErrorCode::FileNotFound,
            GncError::Json(_) => ErrorCode::Serialization,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for GNC operations.
pub type Result<T> = std::result::Result<T, GncError>;
