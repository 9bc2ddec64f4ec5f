//! Archive format detection and extraction.
//!
//! Firmware archives come in a closed set of formats, selected by filename
//! suffix:
//!
//! | suffix     | handling                                                  |
//! |------------|-----------------------------------------------------------|
//! | `.zip`     | all entries extracted directly                            |
//! | `.tar.bz2` | streamed through a bzip2 decoder into the tar unpacker    |
//! | `.tar.zst` | decompressed in memory, written to `temp.tar`, unpacked   |

mod error;
mod extract;
mod format;

pub use error::ExtractError;
pub use extract::{TEMP_TAR_NAME, extract_archive};
pub use format::ArchiveFormat;
