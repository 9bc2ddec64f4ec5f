//! Constants for the download module (timeouts).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default read timeout: the longest gap between received chunks (5 minutes).
/// The transfer as a whole is unbounded.
pub const READ_TIMEOUT_SECS: u64 = 300;
