//! Error types for the flash stage.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while flashing or rebooting the device.
#[derive(Debug, Error)]
pub enum FlashError {
    /// The archive did not contain the flash script.
    #[error("flash script not found at {}", .path.display())]
    ScriptNotFound {
        /// Where the script was expected.
        path: PathBuf,
    },

    /// File system error while preparing the script.
    #[error("IO error preparing {path}: {source}")]
    Io {
        /// The script path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The external program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The external program ran but reported failure.
    #[error("{program} failed with {status}")]
    CommandFailed {
        /// The program that failed.
        program: String,
        /// Its exit status.
        status: ExitStatus,
    },
}

impl FlashError {
    /// Creates a script-not-found error.
    pub fn script_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ScriptNotFound { path: path.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a spawn error.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates a command-failed error.
    pub fn command_failed(program: impl Into<String>, status: ExitStatus) -> Self {
        Self::CommandFailed {
            program: program.into(),
            status,
        }
    }
}
