//! Extraction routines for each supported archive format.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use tracing::{debug, info};

use super::error::ExtractError;
use super::format::ArchiveFormat;

/// Name of the intermediate tar written next to a `.tar.zst` archive.
pub const TEMP_TAR_NAME: &str = "temp.tar";

/// Extracts `archive_path` into `destination` using the handler for `format`.
///
/// Existing files in `destination` are overwritten by archive entries.
///
/// # Errors
///
/// Returns [`ExtractError`] on any read, decode or write failure. Entries
/// already written before the failure are left in place.
pub fn extract_archive(
    format: ArchiveFormat,
    archive_path: &Path,
    destination: &Path,
) -> Result<(), ExtractError> {
    debug!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        %format,
        "extracting archive"
    );

    match format {
        ArchiveFormat::Zip => extract_zip(archive_path, destination)?,
        ArchiveFormat::TarBz2 => extract_tar_bz2(archive_path, destination)?,
        ArchiveFormat::TarZst => extract_tar_zst(archive_path, destination)?,
    }

    info!(archive = %archive_path.display(), "archive extracted");
    Ok(())
}

fn extract_zip(archive_path: &Path, destination: &Path) -> Result<(), ExtractError> {
    let file = File::open(archive_path).map_err(|e| ExtractError::io(archive_path, e))?;
    let mut archive =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| ExtractError::zip(archive_path, e))?;
    archive
        .extract(destination)
        .map_err(|e| ExtractError::zip(archive_path, e))
}

fn extract_tar_bz2(archive_path: &Path, destination: &Path) -> Result<(), ExtractError> {
    let file = File::open(archive_path).map_err(|e| ExtractError::io(archive_path, e))?;
    let decoder = BzDecoder::new(BufReader::new(file));
    unpack_tar(decoder, archive_path, destination)
}

/// The tar unpacker has no zstd transport, so the whole archive is
/// decompressed into memory and staged as a plain tar beside the archive.
fn extract_tar_zst(archive_path: &Path, destination: &Path) -> Result<(), ExtractError> {
    let compressed = std::fs::read(archive_path).map_err(|e| ExtractError::io(archive_path, e))?;
    let decompressed =
        zstd::stream::decode_all(compressed.as_slice()).map_err(|e| ExtractError::io(archive_path, e))?;
    drop(compressed);

    let temp_tar = archive_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(TEMP_TAR_NAME);
    std::fs::write(&temp_tar, &decompressed).map_err(|e| ExtractError::io(&temp_tar, e))?;
    debug!(
        temp_tar = %temp_tar.display(),
        bytes = decompressed.len(),
        "staged decompressed tar"
    );
    drop(decompressed);

    let file = File::open(&temp_tar).map_err(|e| ExtractError::io(&temp_tar, e))?;
    unpack_tar(BufReader::new(file), &temp_tar, destination)
}

fn unpack_tar<R: Read>(
    reader: R,
    archive_path: &Path,
    destination: &Path,
) -> Result<(), ExtractError> {
    tar::Archive::new(reader)
        .unpack(destination)
        .map_err(|e| ExtractError::io(archive_path, e))
}
