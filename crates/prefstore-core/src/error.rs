//! Error types for Prefstore core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while higher-level code can use `anyhow` for
//! convenient error handling.
//!
//! Errors fall into two classes. Validation errors are raised synchronously
//! when a handle is constructed with bad arguments. Storage errors wrap a
//! filesystem or codec failure that happened while loading or persisting a
//! settings document.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using SettingsError
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Core error types for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    // === Validation Errors ===
    /// The application name was empty
    #[error("settings file must have an app name")]
    EmptyAppName,

    /// The application name cannot be used as a file name
    #[error("invalid app name {name:?}: {reason}")]
    InvalidAppName { name: String, reason: String },

    /// No instance id was supplied
    #[error("settings instance must have an id")]
    MissingInstanceId,

    /// The instance id is not a hyphenated UUID
    #[error("settings instance id must be a uuid, got {id:?}")]
    InvalidInstanceId { id: String },

    /// Settings content was not a JSON object
    #[error("settings content must be a JSON object: {reason}")]
    InvalidContent { reason: String },

    // === Storage Errors ===
    /// A filesystem operation on the settings file failed
    #[error("{operation} failed for {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file exists but does not hold a valid document
    #[error("settings file {path} is corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    /// Encoding the document failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No per-user data directory could be determined
    #[error("could not determine the data directory")]
    DataDirUnavailable,

    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl SettingsError {
    /// Returns true if this error was caused by invalid caller arguments.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SettingsError::EmptyAppName
                | SettingsError::InvalidAppName { .. }
                | SettingsError::MissingInstanceId
                | SettingsError::InvalidInstanceId { .. }
                | SettingsError::InvalidContent { .. }
        )
    }

    /// Returns true if this error came from the underlying storage.
    pub fn is_storage(&self) -> bool {
        !self.is_validation()
    }

    /// Create an I/O error tagged with the failing operation and path
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SettingsError::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        SettingsError::Serialization(reason.into())
    }
}
