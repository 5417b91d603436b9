//! Error types used by this crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Custom error type returned when an operation on the game library fails.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Error originating from [`io::Error`], e.g. the library document could not be written
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Error originating from [`serde_json::Error`]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A record with the same executable path is already in the library
    #[error("A game with the path {0:?} already exists in the library")]
    DuplicatePath(PathBuf),

    /// No record has the given ID
    #[error("No game with the ID '{0}' exists in the library")]
    NotFound(String),

    /// An imported document was valid JSON, but not an array of records
    #[error("The document at {0:?} is not a list of games")]
    NotASequence(PathBuf),
}

/// Custom error type returned when reading or changing settings fails.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Error originating from [`io::Error`]
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Error originating from [`serde_json::Error`]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A built-in setting was given a value of the wrong type
    #[error("Invalid value for setting '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Custom error type returned when a game could not be started.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The executable does not exist
    #[error("Game not found: {0:?}")]
    NotFound(PathBuf),

    /// The executable exists, but the OS refused to start it
    #[error("Failed to start {path:?}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The record to launch is not in the library
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Custom error type returned when a version string can't be parsed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version '{0}'")]
    Invalid(String),
}
