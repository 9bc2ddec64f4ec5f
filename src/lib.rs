//! Flasher Core Library
//!
//! This library provides the pieces of the flasher tool, which downloads a
//! firmware archive, unpacks it into a per-run scratch directory and drives
//! the bundled flashing script against one device.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`credentials`] - `user:pass` parsing for HTTP Basic authentication
//! - [`download`] - HTTP fetch and Content-Disposition filename resolution
//! - [`archive`] - Format detection and extraction (`.zip`, `.tar.bz2`, `.tar.zst`)
//! - [`flash`] - Flash script and reboot invocation
//! - [`workspace`] - Per-run scratch directory lifecycle
//! - [`pipeline`] - The sequential fetch → extract → flash → reboot run

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod credentials;
pub mod download;
pub mod flash;
pub mod pipeline;
pub mod workspace;

mod user_agent;

// Re-export commonly used types
pub use archive::{ArchiveFormat, ExtractError, extract_archive};
pub use credentials::{Credentials, CredentialsError};
pub use download::{DownloadError, FetchedArchive, HttpClient, parse_content_disposition};
pub use flash::{DEFAULT_FASTBOOT_PROGRAM, DEFAULT_SCRIPT_NAME, FlashError, FlashRunner};
pub use pipeline::{FlashReport, FlashRequest, PipelineConfig, PipelineError, run_pipeline};
pub use workspace::{ScratchDir, WorkspaceError};
