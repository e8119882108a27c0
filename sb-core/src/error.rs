//! Global error types for socket-bridge.
//!
//! Every error category across the workspace is unified into a single
//! `SbError` enum with conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using SbError.
pub type SbResult<T> = Result<T, SbError>;

/// Unified error type for the socket-bridge crates.
#[derive(Error, Debug)]
pub enum SbError {
    // -- Configuration errors --
    /// Failed to load or parse the bridge configuration.
    #[error("configuration error: {0}")]
    Config(String),

    // -- Event errors --
    /// A wire payload could not be decoded into its typed result.
    #[error("decode error: {0}")]
    Decode(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for SbError {
    fn from(e: serde_json::Error) -> Self {
        SbError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for SbError {
    fn from(e: toml::de::Error) -> Self {
        SbError::Config(e.to_string())
    }
}
