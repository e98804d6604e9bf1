use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilekitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures that abort a tree comparison. No partial result survives either one.
#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("directory does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("failed to read directory {}: {source}", .path.display())]
    DirectoryReadError {
        path: PathBuf,
        #[source]
        source: VfsError,
    },
}

impl ComparisonError {
    /// The path the error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ComparisonError::PathNotFound(path) => path,
            ComparisonError::DirectoryReadError { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum VfsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),
}
