//! Error types for the ratings crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - Enum variants for different error cases
//! - Error messages with context
//! - Automatic `Display` and `Error` trait implementations

use thiserror::Error;

/// Errors that can occur while loading and parsing rating data
///
/// A malformed record is a contract violation by the upstream data source,
/// so parsing stops at the first bad line instead of patching around it.
#[derive(Error, Debug)]
pub enum RatingsError {
    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a rating file couldn't be parsed
    ///
    /// This variant stores context about where the error occurred
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected {expected} fields but found {found} in line {line}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },
}

/// Convenience type alias for Results in this crate
///
/// Instead of writing `Result<T, RatingsError>` everywhere,
/// we can write `Result<T>`
pub type Result<T> = std::result::Result<T, RatingsError>;
