//! Per-run scratch directory lifecycle.
//!
//! Each run gets its own uniquely named directory under a root (the system
//! temp dir by default), so concurrent runs never collide. The directory and
//! everything extracted into it are removed recursively when the run ends,
//! whether it succeeded or failed.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

/// Prefix of every scratch directory name.
pub const SCRATCH_PREFIX: &str = "flasher-";

/// Errors that can occur while setting up the scratch directory.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The root or the scratch directory could not be created.
    #[error("failed to create scratch directory under {root}: {source}")]
    Create {
        /// The configured root.
        root: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// A scratch directory owned by one run.
///
/// Dropping the guard removes the directory tree; [`ScratchDir::close`] does
/// the same but logs the outcome.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Creates a fresh scratch directory under `root`.
    ///
    /// `root` is created if missing and an existing one is reused.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Create`] if either directory cannot be
    /// created.
    pub fn create(root: &Path) -> Result<Self, WorkspaceError> {
        let create_err = |source| WorkspaceError::Create {
            root: root.to_path_buf(),
            source,
        };

        std::fs::create_dir_all(root).map_err(create_err)?;
        // Absolute so that scripts inside it can be spawned with a changed cwd.
        let root = std::path::absolute(root).map_err(create_err)?;

        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&root)
            .map_err(create_err)?;

        debug!(path = %dir.path().display(), "created scratch directory");
        Ok(Self { dir })
    }

    /// The scratch directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the directory tree, logging instead of failing.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(path = %path.display(), "removed scratch directory"),
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to remove scratch directory");
            }
        }
    }
}
