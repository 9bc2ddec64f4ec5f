//! Error types for archive extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while detecting or extracting an archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The filename does not end in a supported archive suffix.
    #[error("unsupported extension {extension:?} for archive {filename}")]
    UnsupportedExtension {
        /// The archive filename.
        filename: String,
        /// Everything from the first `.` of the filename (empty if none).
        extension: String,
    },

    /// File system error while reading the archive or writing its contents.
    #[error("IO error extracting {path}: {source}")]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The zip container could not be read or extracted.
    #[error("invalid zip archive {path}: {source}")]
    Zip {
        /// The archive path.
        path: PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// The blocking extraction task did not complete.
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ExtractError {
    /// Creates an unsupported-extension error for `filename`.
    pub fn unsupported(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let extension = filename
            .find('.')
            .map(|idx| filename[idx..].to_string())
            .unwrap_or_default();
        Self::UnsupportedExtension {
            filename,
            extension,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a zip error.
    pub fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }
}
