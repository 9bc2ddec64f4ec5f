//! Parsing of the `--credentials user:pass` argument.

use thiserror::Error;

/// Errors produced while parsing a credentials string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    /// A non-empty credentials string has no `:` separator.
    #[error("invalid credentials format: missing ':' separator. Use the following format: username:password")]
    MissingSeparator,

    /// More than one `:` separator was found.
    #[error("invalid credentials format: expected exactly one ':' separator, found {count}. Use the following format: username:password")]
    TooManySeparators {
        /// Number of separators found.
        count: usize,
    },
}

/// HTTP Basic credentials for the firmware server.
///
/// Both fields are empty when no credentials were supplied.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Creates credentials from an explicit username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parses a `username:password` string.
    ///
    /// An empty string yields empty credentials. Otherwise exactly one `:`
    /// is required and the string is split at it.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError`] when a non-empty string has no separator
    /// or more than one.
    pub fn parse(raw: &str) -> Result<Self, CredentialsError> {
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let count = raw.matches(':').count();
        match count {
            0 => Err(CredentialsError::MissingSeparator),
            1 => {
                let (username, password) = raw
                    .split_once(':')
                    .ok_or(CredentialsError::MissingSeparator)?;
                Ok(Self::new(username, password))
            }
            _ => Err(CredentialsError::TooManySeparators { count }),
        }
    }

    /// The username, empty when none was supplied.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password, empty when none was supplied.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns `true` when neither half was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    /// Returns the `(username, password)` pair to send as HTTP Basic auth.
    ///
    /// Only `Some` when both halves are non-empty.
    #[must_use]
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        (!self.username.is_empty() && !self.password.is_empty())
            .then_some((self.username.as_str(), self.password.as_str()))
    }
}
