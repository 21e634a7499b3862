//! Error types shared across the organizer.

use std::path::PathBuf;
use thiserror::Error;

/// A failure while moving one file into its category directory.
///
/// These are always recoverable: the organizer logs them and carries on
/// with the next file.
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("{} has no file name component", .path.display())]
    NoFileName { path: PathBuf },
}

/// Errors that abort a whole organize run.
#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("error reading source directory: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write run log: {0}")]
    Log(#[from] std::io::Error),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] toml::de::Error),

    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },

    #[error("invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("IO error reading configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Organize(#[from] OrganizeError),

    #[error("cannot open log file {}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("terminal IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OrganizeResult<T> = Result<T, OrganizeError>;
pub type MoveResult<T> = Result<T, MoveError>;
