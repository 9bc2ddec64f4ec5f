//! HTTP fetch of firmware archives.
//!
//! This module issues the single GET request of a flashing run and resolves
//! the archive filename from the response's Content-Disposition header.
//!
//! # Features
//!
//! - HTTP Basic authentication when credentials are supplied
//! - Structured Content-Disposition parsing (quoted, token and RFC 5987 forms)
//! - Configurable timeouts (30s connect, 5min read stall by default)
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use flasher_core::Credentials;
//! use flasher_core::download::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let fetched = client
//!     .fetch("https://example.com/images/latest", &Credentials::default())
//!     .await?;
//! println!("Archive: {}", fetched.filename()?);
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;
mod filename;

pub use client::{FetchedArchive, HttpClient};
pub use error::DownloadError;
pub use filename::{parse_content_disposition, sanitize_filename};
