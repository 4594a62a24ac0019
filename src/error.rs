//! @ai:module:intent Define error types for session ingestion
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for loading telemetry sessions
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read session file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse session file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid session in {path}: {message}")]
    InvalidSession { path: PathBuf, message: String },

    #[error("Invalid file pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("No session files matching {pattern:?} in {dir}")]
    EmptyInput { dir: PathBuf, pattern: String },

    #[error("No sessions found for either configuration (baseline: {baseline}; treatment: {treatment})")]
    NoSessions { baseline: String, treatment: String },
}

impl Error {
    /// @ai:intent Whether the error reports an empty input set rather than a broken source
    /// @ai:effects pure
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Error::EmptyInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
