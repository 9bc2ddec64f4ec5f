//! Suffix-based archive format detection.

use std::fmt;

use super::error::ExtractError;

/// The archive formats a firmware image may be shipped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// `.zip`
    Zip,
    /// `.tar.bz2`
    TarBz2,
    /// `.tar.zst`
    TarZst,
}

impl ArchiveFormat {
    /// All supported formats.
    pub const ALL: [Self; 3] = [Self::Zip, Self::TarBz2, Self::TarZst];

    /// The filename suffix that selects this format.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::TarBz2 => ".tar.bz2",
            Self::TarZst => ".tar.zst",
        }
    }

    /// Selects the format from a filename suffix (ASCII case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnsupportedExtension`] when no supported
    /// suffix matches.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let lower = filename.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| {
                lower
                    .strip_suffix(format.suffix())
                    .is_some_and(|stem| !stem.is_empty())
            })
            .ok_or_else(|| ExtractError::unsupported(filename))
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
