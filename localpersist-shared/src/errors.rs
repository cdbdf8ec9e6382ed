//! Error types for localpersist.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout localpersist.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors surfaced by the volume registry and its persistence layer.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("volume {0} not found")]
    NotFound(String),

    #[error("volume {0} already exists")]
    AlreadyExists(String),

    #[error("path {} is not inside {}", .target.display(), .base.display())]
    InvalidPath { base: PathBuf, target: PathBuf },

    #[error("path {} for volume {name} not found", .path.display())]
    PathMissing { name: String, path: PathBuf },

    #[error("path {} for volume {name} is a file, not a directory", .path.display())]
    PathIsFile { name: String, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("corrupt state file: {0}")]
    CorruptState(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`PersistError`].
///
/// Transports map these to response codes without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidPath,
    PathMissing,
    PathIsFile,
    Io,
    CorruptState,
    InvalidArgument,
    Internal,
}

impl PersistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PersistError::NotFound(_) => ErrorKind::NotFound,
            PersistError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            PersistError::InvalidPath { .. } => ErrorKind::InvalidPath,
            PersistError::PathMissing { .. } => ErrorKind::PathMissing,
            PersistError::PathIsFile { .. } => ErrorKind::PathIsFile,
            PersistError::Io(_) => ErrorKind::Io,
            PersistError::CorruptState(_) => ErrorKind::CorruptState,
            PersistError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            PersistError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// True for the `NotFound`-class lookup failure.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        PersistError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError::CorruptState(err.to_string())
    }
}
