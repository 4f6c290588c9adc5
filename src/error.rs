//! Error types for regionhash
//!
//! This module defines all error types used throughout the crate. Parameter
//! and region errors are raised before any algorithm handle exists, read
//! errors abort an in-flight invocation, and protocol violations flag misuse
//! of an algorithm handle.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for regionhash operations
#[derive(Error, Debug)]
pub enum HashError {
    /// I/O error while opening or mapping a source
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a window from the source failed
    #[error("Failed to read {length} bytes at address {address:#x}: {source}")]
    SourceRead {
        address: u64,
        length: u64,
        #[source]
        source: std::io::Error,
    },

    /// The source returned fewer bytes than requested
    #[error("Short read at address {address:#x}: expected {expected} bytes, got {actual}")]
    ShortRead {
        address: u64,
        expected: u64,
        actual: u64,
    },

    /// Malformed algorithm parameter (hex text, key length, output size)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Region with start past end
    #[error("Invalid region: start {start:#x} is past end {end:#x}")]
    InvalidRegion { start: u64, end: u64 },

    /// Region reaches outside the source
    #[error("Region {start:#x}..{end:#x} exceeds source bound {bound:#x}")]
    RegionOutOfBounds { start: u64, end: u64, bound: u64 },

    /// Parameter value the backing algorithm cannot honour
    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    /// No descriptor with this id or name
    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Algorithm handle driven out of order
    #[error("Protocol violation: {operation} called while handle is {state}")]
    ProtocolViolation {
        operation: &'static str,
        state: &'static str,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl HashError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Check if this error was raised while configuring an invocation,
    /// before any byte of the source was read
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_)
                | Self::InvalidRegion { .. }
                | Self::RegionOutOfBounds { .. }
                | Self::UnsupportedParameter(_)
                | Self::UnknownAlgorithm(_)
                | Self::ConfigError(_)
        )
    }

    /// Check if this error came from the byte source
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            Self::SourceRead { .. } | Self::ShortRead { .. } | Self::Io { .. }
        )
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for regionhash operations
pub type Result<T> = std::result::Result<T, HashError>;

impl From<serde_json::Error> for HashError {
    fn from(err: serde_json::Error) -> Self {
        HashError::ConfigError(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| HashError::io(path, e))
    }
}
