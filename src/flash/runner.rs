//! Invocation of the flash script and the reboot command.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info, instrument};

use super::error::FlashError;
use super::{DEVICE_SELECTOR_FLAG, EXTRA_OPTS_FLAG};

/// Drives the external tools of a flashing run.
///
/// Every command is awaited to completion with inherited stdio, so the
/// script's own progress output reaches the terminal.
#[derive(Debug, Clone)]
pub struct FlashRunner {
    fastboot: OsString,
}

impl FlashRunner {
    /// Creates a runner that reboots through the given fastboot program.
    #[must_use]
    pub fn new(fastboot: impl Into<OsString>) -> Self {
        Self {
            fastboot: fastboot.into(),
        }
    }

    /// Returns the path of `script_name` inside `dir` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::ScriptNotFound`] when no such file exists.
    pub async fn locate_script(dir: &Path, script_name: &str) -> Result<PathBuf, FlashError> {
        let path = dir.join(script_name);
        let is_file = tokio::fs::metadata(&path)
            .await
            .is_ok_and(|meta| meta.is_file());
        if is_file {
            Ok(path)
        } else {
            Err(FlashError::script_not_found(path))
        }
    }

    /// Runs the full flash sequence for `serial`.
    ///
    /// Locates the script in `dir`, makes it executable, runs it from
    /// `dir`, then reboots the device. The reboot is skipped when any
    /// earlier step fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`FlashError`] encountered.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub async fn flash(
        &self,
        dir: &Path,
        script_name: &str,
        serial: &str,
    ) -> Result<PathBuf, FlashError> {
        let script = Self::locate_script(dir, script_name).await?;
        make_executable(&script).await?;
        self.run_script(&script, serial, dir).await?;
        self.reboot(serial).await?;
        Ok(script)
    }

    /// Runs `script --extra-opts -s <serial>` with `cwd` as working directory.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::Spawn`] if the script cannot be started and
    /// [`FlashError::CommandFailed`] if it exits unsuccessfully.
    pub async fn run_script(&self, script: &Path, serial: &str, cwd: &Path) -> Result<(), FlashError> {
        let mut command = Command::new(script);
        command.args(Self::script_args(serial)).current_dir(cwd);

        info!(script = %script.display(), serial, "flashing the device");
        run_command(command, &script.display().to_string()).await?;
        info!(serial, "device has been flashed");
        Ok(())
    }

    /// Runs `fastboot -s <serial> reboot`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::Spawn`] if fastboot cannot be started and
    /// [`FlashError::CommandFailed`] if it exits unsuccessfully.
    pub async fn reboot(&self, serial: &str) -> Result<(), FlashError> {
        let mut command = Command::new(&self.fastboot);
        command.args(Self::reboot_args(serial));

        info!(serial, "rebooting the device");
        run_command(command, &self.fastboot.to_string_lossy()).await?;
        info!(serial, "device has been rebooted");
        Ok(())
    }

    /// Arguments passed to the flash script.
    #[must_use]
    pub fn script_args(serial: &str) -> [&str; 3] {
        [EXTRA_OPTS_FLAG, DEVICE_SELECTOR_FLAG, serial]
    }

    /// Arguments passed to fastboot for the reboot.
    #[must_use]
    pub fn reboot_args(serial: &str) -> [&str; 3] {
        [DEVICE_SELECTOR_FLAG, serial, "reboot"]
    }
}

/// Adds execute permission for owner, group and others.
#[cfg(unix)]
async fn make_executable(script: &Path) -> Result<(), FlashError> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = tokio::fs::metadata(script)
        .await
        .map_err(|e| FlashError::io(script, e))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    tokio::fs::set_permissions(script, permissions)
        .await
        .map_err(|e| FlashError::io(script, e))?;
    debug!(script = %script.display(), "marked script executable");
    Ok(())
}

#[cfg(not(unix))]
async fn make_executable(_script: &Path) -> Result<(), FlashError> {
    Ok(())
}

async fn run_command(mut command: Command, program: &str) -> Result<(), FlashError> {
    debug!(?command, "spawning");
    let status = command
        .status()
        .await
        .map_err(|e| FlashError::spawn(program, e))?;

    if !status.success() {
        return Err(FlashError::command_failed(program, status));
    }
    debug!(program, %status, "command finished");
    Ok(())
}
