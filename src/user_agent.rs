//! User-Agent string for firmware download requests.

/// Default User-Agent for download requests (identifies the tool).
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("flasher/{version} (firmware-download)")
}
