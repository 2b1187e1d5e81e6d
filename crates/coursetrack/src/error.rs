//! Error types for coursetrack.
//!
//! This module defines all error types used throughout the coursetrack crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for coursetrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
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

    /// The key-value store refused the call altogether.
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        /// Why the store could not be used.
        reason: String,
    },

    /// A write would push the store past its quota.
    #[error("store quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Configured quota in bytes.
        quota: usize,
    },

    // === Backup Errors ===
    /// An imported backup document could not be understood.
    #[error("malformed backup document: {message}")]
    MalformedBackup {
        /// Description of the parse failure.
        message: String,
    },

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

    // === I/O Errors ===
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
}

/// A specialized Result type for coursetrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new store-unavailable error.
    #[must_use]
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a new malformed-backup error.
    #[must_use]
    pub fn malformed_backup(message: impl Into<String>) -> Self {
        Self::MalformedBackup {
            message: message.into(),
        }
    }

    /// Check if this error means the store could not be reached or written.
    ///
    /// Database failures count: to the section logic a broken database is
    /// the same as a missing one.
    #[must_use]
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. }
                | Self::QuotaExceeded { .. }
                | Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseMigration { .. }
        )
    }

    /// Check if this error is a backup parse failure.
    #[must_use]
    pub fn is_malformed_backup(&self) -> bool {
        matches!(self, Self::MalformedBackup { .. })
    }
}
