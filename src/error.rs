//! Error types for the family-board-tools library.
//!
//! This module provides custom error types using `thiserror` so the binaries can
//! tell configuration problems apart from backend and file system failures.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the family board backend.
#[derive(Error, Debug)]
pub enum BoardError {
    /// The env file holding the backend credentials does not exist
    #[error(".env file not found at {}", .0.display())]
    EnvFileNotFound(PathBuf),

    /// The env file exists but could not be parsed
    #[error("Could not read env file {}: {message}", path.display())]
    EnvFile {
        /// Path of the env file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A required credential is missing or empty
    #[error("{0} must be set in .env")]
    MissingCredential(&'static str),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Backend URL could not be parsed or joined
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// An update without any filter would touch every row of the table
    #[error("Refusing to update every row of '{0}' without a filter")]
    UnfilteredUpdate(String),

    /// A row could not be decoded into its typed view
    #[error("Invalid row in '{table}': {message}")]
    InvalidRow {
        /// Table the row came from
        table: String,
        /// Decoder message
        message: String,
    },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Result with `BoardError`
pub type Result<T> = std::result::Result<T, BoardError>;

impl From<config::ConfigError> for BoardError {
    fn from(err: config::ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

impl BoardError {
    /// True for errors that should stop a tool before it does any work.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EnvFileNotFound(_)
                | Self::EnvFile { .. }
                | Self::MissingCredential(_)
                | Self::InvalidConfig(_)
                | Self::InvalidUrl(_)
        )
    }
}
