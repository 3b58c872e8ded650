//! # Error Types
//!
//! Structured error types for defs_core. Every failure of the generator is
//! fatal and maps to exit status 1; the variants exist so the message names
//! exactly which check or which file operation failed.
//!
//! ## Example
//!
//! ```rust
//! use defs_core::errors::{DefsError, DefsResult};
//!
//! fn check_width(width: i64) -> DefsResult<()> {
//!     if width != 4 && width != 8 {
//!         return Err(DefsError::UnsupportedPrecision { code: (width / 4) as i32, width });
//!     }
//!     Ok(())
//! }
//! assert!(check_width(16).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for defs_core operations
pub type DefsResult<T> = Result<T, DefsError>;

/// Structured error type for the generator.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DefsError {
    /// The generator was invoked with arguments
    #[error("usage: {program} takes no arguments ({count} given)")]
    Usage { program: String, count: usize },

    /// libQuEST reported a precision whose width is not 4 or 8 bytes
    #[error("libQuEST reports precision code {code} (qreal width {width} bytes); only 4 or 8 bytes are supported")]
    UnsupportedPrecision { code: i32, width: i64 },

    /// libQuEST and this build disagree on the size of qreal
    #[error("libQuEST qreal is {library_width} bytes but this generator was compiled for {compiled_width}-byte qreal")]
    PrecisionMismatch { library_width: u32, compiled_width: u32 },

    /// The shared library could not be loaded or lacks the accessor
    #[error("Library error: {operation} '{library}' - {reason}")]
    LibraryError {
        operation: String,
        library: String,
        reason: String,
    },

    /// The mirrored struct layout contract does not hold
    #[error("Layout contract violated for {subject}: {reason}")]
    LayoutContract { subject: String, reason: String },

    /// Invalid configuration value or unreadable config file
    #[error("Config error: {key} = '{value}' - {reason}")]
    ConfigError {
        key: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },
}

impl DefsError {
    /// Create a Usage error
    pub fn usage(program: impl Into<String>, count: usize) -> Self {
        DefsError::Usage {
            program: program.into(),
            count,
        }
    }

    /// Create a LibraryError
    pub fn library_error(operation: impl Into<String>, library: impl Into<String>, reason: impl Into<String>) -> Self {
        DefsError::LibraryError {
            operation: operation.into(),
            library: library.into(),
            reason: reason.into(),
        }
    }

    /// Create a LayoutContract error
    pub fn layout_contract(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        DefsError::LayoutContract {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(key: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        DefsError::ConfigError {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        DefsError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for failures detected before the output file is opened.
    pub fn is_pre_output(&self) -> bool {
        !matches!(self, DefsError::FileError { .. })
    }

    /// Process exit status for this error. Every failure path exits with 1.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DefsError::Usage { .. } => "USAGE",
            DefsError::UnsupportedPrecision { .. } => "UNSUPPORTED_PRECISION",
            DefsError::PrecisionMismatch { .. } => "PRECISION_MISMATCH",
            DefsError::LibraryError { .. } => "LIBRARY_ERROR",
            DefsError::LayoutContract { .. } => "LAYOUT_CONTRACT",
            DefsError::ConfigError { .. } => "CONFIG_ERROR",
            DefsError::FileError { .. } => "FILE_ERROR",
        }
    }
}
