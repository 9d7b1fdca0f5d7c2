/// Error types for the qqwry library
use thiserror::Error;

/// Result type alias for qqwry operations
pub type Result<T> = std::result::Result<T, QqwryError>;

/// Main error type for qqwry operations
///
/// Only loading and validation can fail. Lookups never return errors: a
/// malformed address or an unmatched range yields an empty result instead.
#[derive(Debug, Error)]
pub enum QqwryError {
    /// The database file could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Memory mapping errors
    #[error("Memory mapping error: {0}")]
    Mmap(String),

    /// The buffer does not have a usable QQwry header
    #[error("Format error: {0}")]
    Format(String),
}

impl QqwryError {
    /// Creates a new format error.
    pub fn format(msg: impl Into<String>) -> Self {
        QqwryError::Format(msg.into())
    }
}
