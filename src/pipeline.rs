//! The sequential flashing run: fetch → extract → flash → reboot.
//!
//! [`run_pipeline`] owns the scratch directory for the whole run and removes
//! it on every exit path before returning.

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::archive::{ArchiveFormat, ExtractError, extract_archive};
use crate::credentials::{Credentials, CredentialsError};
use crate::download::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use crate::download::{DownloadError, HttpClient};
use crate::flash::{DEFAULT_FASTBOOT_PROGRAM, DEFAULT_SCRIPT_NAME, FlashError, FlashRunner};
use crate::workspace::{ScratchDir, WorkspaceError};

/// Any fatal error of a flashing run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The credentials argument is malformed.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// The scratch directory could not be set up.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Fetching or storing the archive failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The archive format is unsupported or extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The flash script or the reboot failed.
    #[error(transparent)]
    Flash(#[from] FlashError),
}

/// What to flash and where to get it.
#[derive(Debug, Clone)]
pub struct FlashRequest {
    /// Credentials for the firmware server (may be empty).
    pub credentials: Credentials,
    /// Serial number selecting the target device.
    pub serial: String,
    /// Download URL of the firmware archive.
    pub url: String,
}

impl FlashRequest {
    /// Builds a request, parsing the raw `user:pass` credentials string.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Credentials`] when the credentials string is
    /// malformed.
    pub fn new(
        serial: impl Into<String>,
        url: impl Into<String>,
        raw_credentials: &str,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            credentials: Credentials::parse(raw_credentials)?,
            serial: serial.into(),
            url: url.into(),
        })
    }
}

/// Environment knobs for a run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory under which the per-run scratch directory is created.
    pub work_root: PathBuf,
    /// Name of the flash script inside the archive.
    pub script_name: String,
    /// Program used to reboot the device.
    pub fastboot: OsString,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// HTTP read timeout in seconds (longest stall between received data).
    pub read_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_root: std::env::temp_dir(),
            script_name: DEFAULT_SCRIPT_NAME.to_string(),
            fastboot: OsString::from(DEFAULT_FASTBOOT_PROGRAM),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// Summary of a successful run.
///
/// The paths point into the scratch directory, which no longer exists
/// once [`run_pipeline`] has returned.
#[derive(Debug, Clone)]
pub struct FlashReport {
    /// Where the archive was stored.
    pub archive_path: PathBuf,
    /// The detected archive format.
    pub format: ArchiveFormat,
    /// The flash script that was run.
    pub script_path: PathBuf,
    /// The flashed device.
    pub serial: String,
}

/// Runs one complete flashing run.
///
/// # Errors
///
/// Returns the first [`PipelineError`] encountered. The scratch directory
/// is removed in every case.
#[instrument(skip_all, fields(serial = %request.serial, url = %request.url))]
pub async fn run_pipeline(
    request: &FlashRequest,
    config: &PipelineConfig,
) -> Result<FlashReport, PipelineError> {
    let scratch = ScratchDir::create(&config.work_root)?;
    let result = run_in_scratch(&scratch, request, config).await;
    scratch.close();
    result
}

async fn run_in_scratch(
    scratch: &ScratchDir,
    request: &FlashRequest,
    config: &PipelineConfig,
) -> Result<FlashReport, PipelineError> {
    let client = HttpClient::new_with_timeouts(config.connect_timeout_secs, config.read_timeout_secs);
    let fetched = client.fetch(&request.url, &request.credentials).await?;

    let filename = fetched.filename()?;
    let format = ArchiveFormat::from_filename(&filename)?;
    debug!(%filename, %format, "resolved archive");

    let archive_path = fetched.save_to(scratch.path(), &filename).await?;
    drop(fetched);
    info!(file = %filename, "file has been downloaded");

    let destination = scratch.path().to_path_buf();
    let archive = archive_path.clone();
    tokio::task::spawn_blocking(move || extract_archive(format, &archive, &destination))
        .await
        .map_err(ExtractError::from)??;

    let runner = FlashRunner::new(config.fastboot.clone());
    let script_path = runner
        .flash(scratch.path(), &config.script_name, &request.serial)
        .await?;

    Ok(FlashReport {
        archive_path,
        format,
        script_path,
        serial: request.serial.clone(),
    })
}
