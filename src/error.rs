//! Error types for the Scriptorium library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`ScriptoriumError`] enum. Errors only occur during load and build:
//! every query-time operation (`get`, `is_activated`, `classify`, ...) is a
//! total function that answers with sentinel values instead of failing.
//!
//! # Examples
//!
//! ```
//! use scriptorium::error::{Result, ScriptoriumError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ScriptoriumError::source_not_found("corpus.txt"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Scriptorium operations.
///
/// Uses the `thiserror` crate for automatic `Error` trait implementation and
/// provides convenient constructor methods for the common cases.
#[derive(Error, Debug)]
pub enum ScriptoriumError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The transcription source path or stream does not exist.
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// Configuration errors, including invalid table data.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse errors for inputs that are fatally malformed as a whole.
    ///
    /// Individual malformed rows inside a transcription file are never
    /// fatal; they are skipped and counted in the load diagnostics.
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with [`ScriptoriumError`].
pub type Result<T> = std::result::Result<T, ScriptoriumError>;

impl ScriptoriumError {
    /// Create a new source-not-found error.
    pub fn source_not_found<S: Into<String>>(msg: S) -> Self {
        ScriptoriumError::SourceNotFound(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ScriptoriumError::Config(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        ScriptoriumError::Parse(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ScriptoriumError::Other(msg.into())
    }
}
