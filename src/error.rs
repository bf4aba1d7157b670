//! Error types for niio.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for niio operations.
pub type Result<T> = std::result::Result<T, NiioError>;

/// Errors that can occur while loading neuroimaging files.
#[derive(Debug, Error)]
pub enum NiioError {
    /// The input path does not exist.
    #[error("File not found: {path}")]
    MissingFile { path: PathBuf },

    /// No reader is registered for the file suffix.
    #[error("Unsupported file extension: {extension}")]
    UnsupportedExtension { extension: String },

    /// The container could not be opened or parsed by any backend.
    #[error("Failed to read {path}: {reason}")]
    ReadFailure { path: PathBuf, reason: String },

    /// A requested dataset, array index or attribute is absent.
    #[error("{path} does not have dataset {key}")]
    MissingKey { path: PathBuf, key: String },

    /// A requested HDF5 group is absent.
    #[error("{path} does not have group {group}")]
    MissingGroup { path: PathBuf, group: String },

    /// The parsed object is of a kind no reader knows how to extract from.
    #[error("Cannot access array data in {path}: unsupported {kind}")]
    UnsupportedContainer { path: PathBuf, kind: String },

    /// The dataset selector has the wrong shape for this reader.
    #[error("Invalid dataset selector for {reader} reader: {selector}")]
    InvalidSelector {
        reader: &'static str,
        selector: String,
    },

    /// Arrays could not be combined.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NiioError {
    /// Create a MissingFile error.
    pub fn missing_file(path: &Path) -> Self {
        Self::MissingFile {
            path: path.to_path_buf(),
        }
    }

    /// Create an UnsupportedExtension error.
    pub fn unsupported_extension(extension: impl Into<String>) -> Self {
        Self::UnsupportedExtension {
            extension: extension.into(),
        }
    }

    /// Create a ReadFailure error.
    pub fn read_failure(path: &Path, reason: impl ToString) -> Self {
        Self::ReadFailure {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Create a MissingKey error.
    pub fn missing_key(path: &Path, key: impl Into<String>) -> Self {
        Self::MissingKey {
            path: path.to_path_buf(),
            key: key.into(),
        }
    }

    /// Create a MissingGroup error.
    pub fn missing_group(path: &Path, group: impl Into<String>) -> Self {
        Self::MissingGroup {
            path: path.to_path_buf(),
            group: group.into(),
        }
    }

    /// Create an UnsupportedContainer error.
    pub fn unsupported_container(path: &Path, kind: impl Into<String>) -> Self {
        Self::UnsupportedContainer {
            path: path.to_path_buf(),
            kind: kind.into(),
        }
    }

    /// Create an InvalidSelector error.
    pub fn invalid_selector(reader: &'static str, selector: impl std::fmt::Debug) -> Self {
        Self::InvalidSelector {
            reader,
            selector: format!("{:?}", selector),
        }
    }
}

/// Fail with [`NiioError::MissingFile`] unless `path` exists.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(NiioError::missing_file(path))
    }
}
