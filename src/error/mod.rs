//! Error handling for the ledger
//!
//! This module provides the error types shared by the ledger core, the
//! command interpreter and the HTTP layer.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for ledger operations
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Missing or malformed commit payload; the chain is left untouched
    InvalidRequest(String),
    /// Hash or link mismatch found while verifying the chain
    ChainIntegrityViolation { index: u64, reason: String },
    /// Fatal to the current request, but not to the process
    UnrecoverableRuntimeFault(String),
    /// Configuration errors
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            LedgerError::ChainIntegrityViolation { index, reason } => {
                write!(f, "Chain integrity violation at block {index}: {reason}")
            }
            LedgerError::UnrecoverableRuntimeFault(msg) => write!(f, "Runtime fault: {msg}"),
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_violation_names_the_block() {
        let err = LedgerError::ChainIntegrityViolation {
            index: 3,
            reason: "hash mismatch".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Chain integrity violation at block 3: hash mismatch"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: LedgerError = io.into();
        assert!(matches!(err, LedgerError::Io(msg) if msg.contains("missing.json")));
    }
}
