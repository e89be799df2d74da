//! Error types for littlelemon.
//!
//! This module defines all error types used throughout the littlelemon crate.
//! Storage and network failures are kept apart so callers can decide whether
//! a failure means "no data yet" or "try again later".

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for littlelemon operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create a database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to close a database cleanly.
    #[error("failed to close database at {path}: {source}")]
    DatabaseClose {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    // === Network Errors ===
    /// The menu feed request could not be completed.
    #[error("menu feed request to {url} failed: {source}")]
    FeedRequest {
        /// The feed URL.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The menu feed answered with a non-success status.
    #[error("menu feed at {url} returned HTTP {status}")]
    FeedStatus {
        /// The feed URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The menu feed payload could not be decoded.
    #[error("malformed menu feed payload: {0}")]
    FeedPayload(String),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Session Errors ===
    /// A profile change was rejected because some fields are invalid.
    #[error("invalid profile fields: {}", fields.join(", "))]
    InvalidProfile {
        /// Names of the offending fields.
        fields: Vec<&'static str>,
    },

    /// No profile is stored for the current session.
    #[error("no profile stored")]
    ProfileMissing,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for littlelemon operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a feed payload error.
    #[must_use]
    pub fn feed_payload(message: impl Into<String>) -> Self {
        Self::FeedPayload(message.into())
    }

    /// Check if this error came from the local store.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseMigration { .. }
                | Self::DatabaseClose { .. }
                | Self::DirectoryCreate { .. }
        )
    }

    /// Check if this error came from the remote menu feed.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::FeedRequest { .. } | Self::FeedStatus { .. } | Self::FeedPayload(_)
        )
    }
}
