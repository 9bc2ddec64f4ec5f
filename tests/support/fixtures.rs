//! Shared fixtures for integration tests: in-memory firmware archives,
//! argument-recording fake tools, and mock firmware servers.
//!
//! Every fake tool appends one line per invocation to a shared log so tests
//! can assert on call order and arguments.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a plain tar archive from `(name, contents)` pairs (mode 0644).
pub fn tar_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, *data)
            .expect("append tar entry");
    }
    builder.into_inner().expect("finish tar")
}

/// Builds a `.tar.bz2` archive.
pub fn tar_bz2_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder
        .write_all(&tar_bytes(entries))
        .expect("bzip2 encode");
    encoder.finish().expect("finish bzip2")
}

/// Builds a `.tar.zst` archive.
pub fn tar_zst_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    zstd::stream::encode_all(tar_bytes(entries).as_slice(), 0).expect("zstd encode")
}

/// Builds a `.zip` archive.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Body of a flash script that records its arguments (and whether a staged
/// `temp.tar` is present in its working directory) and exits with `exit_code`.
pub fn flash_script(log: &Path, exit_code: i32) -> Vec<u8> {
    format!(
        "#!/bin/sh\n\
         [ -f temp.tar ] && echo \"staged temp.tar\" >> '{log}'\n\
         echo \"flash.sh $*\" >> '{log}'\n\
         exit {exit_code}\n",
        log = log.display()
    )
    .into_bytes()
}

/// Writes an executable fake `fastboot` into `dir` that records its arguments.
#[cfg(unix)]
pub fn fake_fastboot(dir: &Path, log: &Path, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let fastboot = dir.join("fastboot");
    let body = format!(
        "#!/bin/sh\necho \"fastboot $*\" >> '{}'\nexit {exit_code}\n",
        log.display()
    );
    std::fs::write(&fastboot, body).expect("write fake fastboot");
    std::fs::set_permissions(&fastboot, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake fastboot");
    fastboot
}

/// Starts a mock server serving `body` at `/firmware` as `filename`.
pub async fn serve_archive(filename: &str, body: Vec<u8>) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/firmware"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Content-Disposition",
                    format!("attachment; filename=\"{filename}\"").as_str(),
                )
                .set_body_bytes(body),
        )
        .mount(&mock_server)
        .await;
    mock_server
}

/// The firmware URL on a server started by [`serve_archive`].
pub fn firmware_url(mock_server: &MockServer) -> String {
    format!("{}/firmware", mock_server.uri())
}

/// Reads the call log, empty when nothing was recorded.
pub fn read_log(log: &Path) -> String {
    std::fs::read_to_string(log).unwrap_or_default()
}

/// Returns `true` when `dir` has no entries left.
pub fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .expect("read work root")
        .next()
        .is_none()
}
