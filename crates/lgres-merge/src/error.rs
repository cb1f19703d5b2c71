//! Error types for the archive merger.

use std::path::PathBuf;

use lgres_formats::ResError;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Fewer than one input and one output path
    #[error("Expected at least one input and one output path, got {0} path(s)")]
    MissingPaths(usize),

    /// Input archive does not exist
    #[error("Input archive not found: {0}")]
    InputNotFound(PathBuf),

    /// Output path would overwrite one of the inputs
    #[error("Output {0} is also an input")]
    OutputIsInput(PathBuf),

    /// Comment cannot be stored in the archive header
    #[error("Invalid comment: {0}")]
    InvalidComment(#[source] ResError),
}

/// Errors raised while merging archives.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to read an input archive
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Input path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input archive is malformed
    #[error("Invalid archive {path}: {source}")]
    Archive {
        /// Input path
        path: PathBuf,
        /// Underlying format error
        #[source]
        source: ResError,
    },

    /// Failed to build the merged archive
    #[error("Failed to build merged archive: {0}")]
    Build(#[from] ResError),

    /// Failed to write the output archive
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for merge operations
pub type Result<T> = std::result::Result<T, MergeError>;
