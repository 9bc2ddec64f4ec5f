//! Error types for the download module.
//!
//! This module defines structured errors for the fetch stage, providing
//! context-rich error messages for debugging and user feedback.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching and storing a firmware archive.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server answered with something other than 200 OK.
    #[error("failed to get the file from {url}. Status code: {status}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Authentication or authorization required to access the resource.
    #[error(
        "authentication required (HTTP {status}) downloading {url}\n  Suggestion: {suggestion}"
    )]
    AuthRequired {
        /// The URL that requires authentication.
        url: String,
        /// The HTTP status code (401, 403 or 407).
        status: u16,
        /// User-facing suggestion for resolving the auth issue.
        suggestion: &'static str,
    },

    /// The response carried no Content-Disposition header.
    #[error("response from {url} has no Content-Disposition header")]
    MissingContentDisposition {
        /// The URL whose response lacked the header.
        url: String,
    },

    /// The Content-Disposition header has no usable filename parameter.
    #[error("malformed Content-Disposition header {header:?}: {reason}")]
    MalformedContentDisposition {
        /// The raw header value.
        header: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// File system error while storing the archive.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a missing Content-Disposition error.
    pub fn missing_content_disposition(url: impl Into<String>) -> Self {
        Self::MissingContentDisposition { url: url.into() }
    }

    /// Creates a malformed Content-Disposition error.
    pub fn malformed_content_disposition(header: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedContentDisposition {
            header: header.into(),
            reason,
        }
    }

    /// Creates an authentication-required error.
    ///
    /// 407 (Proxy Authentication Required) gets a proxy hint, everything
    /// else points at `--credentials`.
    pub fn auth_required(url: impl Into<String>, status: u16) -> Self {
        let suggestion = if status == 407 {
            "Configure your HTTP proxy settings or check proxy credentials."
        } else {
            "Check the --credentials value (username:password)."
        };
        Self::AuthRequired {
            url: url.into(),
            status,
            suggestion,
        }
    }

    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } | Self::AuthRequired { status, .. } => Some(*status),
            _ => None,
        }
    }
}
