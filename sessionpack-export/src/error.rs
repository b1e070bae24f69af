//! Error types for the sessionpack-export crate.

use sessionpack_model::{StyleError, ValueError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning styles or views into JSON documents.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Style '{style}' cannot produce {property}: {source}")]
    Style {
        style: String,
        property: String,
        #[source]
        source: StyleError,
    },

    #[error("Bypass {property} on '{element}' in network '{network}' is invalid: {source}")]
    Bypass {
        network: String,
        element: String,
        property: String,
        #[source]
        source: ValueError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while assembling the archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to walk resource tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Archive entry would be written twice: {0}")]
    DuplicateEntry(String),

    #[error("Data file has no recognized name prefix: {}", .0.display())]
    UnrecognizedDataFile(PathBuf),
}

/// Errors that abort an export job.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No network view to export")]
    NoNetworkView,

    #[error("Web session export needs a resource directory")]
    MissingResourceRoot,

    #[error("Resource directory not found: {}", .0.display())]
    ResourceRootNotFound(PathBuf),

    #[error("Scratch directory {} is inside the resource directory", .0.display())]
    ScratchInsideResourceRoot(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(SerializationError::Json(err))
    }
}
