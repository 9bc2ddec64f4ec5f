//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use flasher_core::download::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use flasher_core::{
    DEFAULT_FASTBOOT_PROGRAM, DEFAULT_SCRIPT_NAME, FlashRequest, PipelineConfig, PipelineError,
};

/// Download a firmware archive and flash it onto a device.
///
/// The archive (`.zip`, `.tar.bz2` or `.tar.zst`) is fetched from URL,
/// extracted into a fresh scratch directory, and its `flash.sh` is run
/// against the device with the given serial number, which is then rebooted.
#[derive(Parser)]
#[command(name = "flasher")]
#[command(author, version, about)]
pub struct Args {
    /// Serial number of the device
    pub serial: String,

    /// URL of the file to download
    pub url: String,

    /// Username and password (username:password)
    #[arg(long, default_value = "")]
    pub credentials: String,

    /// Directory in which the per-run scratch directory is created [default: system temp dir]
    #[arg(long, value_name = "DIR")]
    pub work_root: Option<PathBuf>,

    /// Name of the flash script inside the archive
    #[arg(long, default_value = DEFAULT_SCRIPT_NAME)]
    pub script_name: String,

    /// Program used to reboot the device
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_FASTBOOT_PROGRAM)]
    pub fastboot: PathBuf,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// HTTP read timeout in seconds: longest stall between received data (1-86400)
    #[arg(long, value_name = "SECS", default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=86_400))]
    pub read_timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("serial", &self.serial)
            .field("url", &self.url)
            .field("credentials", &(!self.credentials.is_empty()).then_some("<redacted>"))
            .field("work_root", &self.work_root)
            .field("script_name", &self.script_name)
            .field("fastboot", &self.fastboot)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .finish()
    }
}

impl Args {
    /// Log level used when `RUST_LOG` is not set.
    ///
    /// Priority: quiet flag > verbose flag > default (info).
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Builds the flash request, validating the credentials.
    pub fn flash_request(&self) -> Result<FlashRequest, PipelineError> {
        FlashRequest::new(&self.serial, &self.url, &self.credentials)
    }

    /// Builds the pipeline configuration from the remaining flags.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            work_root: self.work_root.clone().unwrap_or(defaults.work_root),
            script_name: self.script_name.clone(),
            fastboot: self.fastboot.clone().into_os_string(),
            connect_timeout_secs: self.connect_timeout,
            read_timeout_secs: self.read_timeout,
        }
    }
}
