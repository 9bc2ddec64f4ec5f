//! HTTP client wrapper for fetching firmware archives.
//!
//! This module provides the `HttpClient` struct which performs the single
//! buffered GET of a flashing run with timeout configuration and error
//! handling.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_DISPOSITION, HeaderMap, HeaderValue};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::{parse_content_disposition, sanitize_filename};
use crate::credentials::Credentials;
use crate::user_agent;

/// HTTP client for fetching firmware archives.
///
/// # Example
///
/// ```no_run
/// use flasher_core::Credentials;
/// use flasher_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let creds = Credentials::parse("user:pass")?;
/// let fetched = client.fetch("https://example.com/image", &creds).await?;
/// println!("{} bytes", fetched.body().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A successful (200 OK) response with its body fully buffered.
#[derive(Debug, Clone)]
pub struct FetchedArchive {
    url: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes without receiving data
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Sends one GET request and buffers the whole response body.
    ///
    /// HTTP Basic authentication is attached only when both the username
    /// and the password are non-empty. Anything but `200 OK` is an error.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns a status other than 200
    #[instrument(skip(self, credentials), fields(url = %url))]
    pub async fn fetch(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<FetchedArchive, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let mut request = self.client.get(url);
        if let Some((username, password)) = credentials.basic_auth() {
            debug!(username, "attaching basic auth");
            request = request.basic_auth(username, Some(password));
        } else {
            debug!("sending anonymous request");
        }

        let response = request.send().await.map_err(|e| map_send_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let code = status.as_u16();
            if matches!(code, 401 | 403 | 407) {
                return Err(DownloadError::auth_required(url, code));
            }
            return Err(DownloadError::http_status(url, code));
        }

        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_send_error(url, e))?
            .to_vec();

        info!(bytes = body.len(), "archive fetched");

        Ok(FetchedArchive {
            url: url.to_string(),
            headers,
            body,
        })
    }

}

/// Header bytes as text: UTF-8 when valid, ISO-8859-1 otherwise.
fn header_text(value: &HeaderValue) -> Cow<'_, str> {
    match value.to_str() {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => match std::str::from_utf8(value.as_bytes()) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => Cow::Owned(value.as_bytes().iter().map(|&b| char::from(b)).collect()),
        },
    }
}

fn map_send_error(url: &str, error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::timeout(url)
    } else {
        DownloadError::network(url, error)
    }
}

impl FetchedArchive {
    /// The URL the archive was fetched from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The buffered response body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Resolves the archive filename from the Content-Disposition header.
    ///
    /// The returned name is sanitized into a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::MissingContentDisposition`] when the header
    /// is absent, and [`DownloadError::MalformedContentDisposition`] when it
    /// has no usable filename.
    pub fn filename(&self) -> Result<String, DownloadError> {
        let value = self
            .headers
            .get(CONTENT_DISPOSITION)
            .ok_or_else(|| DownloadError::missing_content_disposition(&self.url))?;
        let header = header_text(value);

        let raw = parse_content_disposition(&header)?;
        let filename = sanitize_filename(&raw);
        if filename != raw {
            debug!(raw = %raw, sanitized = %filename, "sanitized archive filename");
        }
        Ok(filename)
    }

    /// Writes the body to `dir/filename`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Io`] if the old file cannot be removed or
    /// the new one cannot be written.
    pub async fn save_to(&self, dir: &Path, filename: &str) -> Result<PathBuf, DownloadError> {
        let path = dir.join(filename);

        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| DownloadError::io(&path, e))?
        {
            debug!(path = %path.display(), "removing existing archive");
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| DownloadError::io(&path, e))?;
        }

        tokio::fs::write(&path, &self.body)
            .await
            .map_err(|e| DownloadError::io(&path, e))?;

        debug!(path = %path.display(), bytes = self.body.len(), "archive written");
        Ok(path)
    }
}
