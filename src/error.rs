//! Global error handling for projdump
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for projdump operations
#[derive(Error, Debug)]
pub enum ProjDumpError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Directory traversal errors
    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Configuration and selection errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Import document does not carry the required markers
    #[error("Invalid project export document: {0}")]
    InvalidDocument(String),

    /// JSON report errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for projdump operations
pub type Result<T> = std::result::Result<T, ProjDumpError>;

/// Creates a ProjDumpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ProjDumpError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            ProjDumpError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

// Lets `main` keep its io::Result signature
impl From<ProjDumpError> for io::Error {
    fn from(err: ProjDumpError) -> Self {
        match err {
            ProjDumpError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
