//! End-to-end tests of the flashing run against mock servers and fake tools.

#![cfg(unix)]

mod support;

use flasher_core::{
    ArchiveFormat, CredentialsError, DownloadError, ExtractError, FlashError, FlashRequest,
    PipelineConfig, PipelineError, run_pipeline,
};
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::fixtures::{
    fake_fastboot, firmware_url, flash_script, is_empty_dir, read_log, serve_archive, tar_bz2_bytes,
    tar_zst_bytes, zip_bytes,
};

/// Test environment: a work root for scratch dirs, a fake fastboot and a call log.
struct Harness {
    _temp: TempDir,
    work_root: std::path::PathBuf,
    log: std::path::PathBuf,
    config: PipelineConfig,
}

impl Harness {
    fn new(fastboot_exit: i32) -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let work_root = temp.path().join("work");
        let bin_dir = temp.path().join("bin");
        std::fs::create_dir_all(&work_root).expect("work root");
        std::fs::create_dir_all(&bin_dir).expect("bin dir");
        let log = temp.path().join("calls.log");
        let fastboot = fake_fastboot(&bin_dir, &log, fastboot_exit);

        let config = PipelineConfig {
            work_root: work_root.clone(),
            fastboot: fastboot.into_os_string(),
            ..PipelineConfig::default()
        };

        Self {
            _temp: temp,
            work_root,
            log,
            config,
        }
    }

    fn request(&self, url: String) -> FlashRequest {
        FlashRequest::new("SER123", url, "").expect("valid request")
    }
}

#[tokio::test]
async fn test_tar_bz2_end_to_end_flashes_then_reboots() {
    let harness = Harness::new(0);
    let script = flash_script(&harness.log, 0);
    let archive = tar_bz2_bytes(&[
        ("flash.sh", script.as_slice()),
        ("images/boot.img", b"boot".as_slice()),
    ]);
    let mock_server = serve_archive("image.tar.bz2", archive).await;

    let report = run_pipeline(&harness.request(firmware_url(&mock_server)), &harness.config)
        .await
        .expect("pipeline should succeed");

    assert_eq!(report.format, ArchiveFormat::TarBz2);
    assert_eq!(report.serial, "SER123");
    assert_eq!(
        report.archive_path.file_name().and_then(|n| n.to_str()),
        Some("image.tar.bz2")
    );
    assert_eq!(
        read_log(&harness.log),
        "flash.sh --extra-opts -s SER123\nfastboot -s SER123 reboot\n"
    );
    assert!(
        is_empty_dir(&harness.work_root),
        "scratch directory must be removed"
    );
}

#[tokio::test]
async fn test_tar_zst_stages_temp_tar_before_flashing() {
    let harness = Harness::new(0);
    let script = flash_script(&harness.log, 0);
    let archive = tar_zst_bytes(&[("flash.sh", script.as_slice())]);
    let mock_server = serve_archive("image.tar.zst", archive).await;

    let report = run_pipeline(&harness.request(firmware_url(&mock_server)), &harness.config)
        .await
        .expect("pipeline should succeed");

    assert_eq!(report.format, ArchiveFormat::TarZst);
    assert_eq!(
        read_log(&harness.log),
        "staged temp.tar\nflash.sh --extra-opts -s SER123\nfastboot -s SER123 reboot\n"
    );
    assert!(is_empty_dir(&harness.work_root));
}

#[tokio::test]
async fn test_zip_end_to_end() {
    let harness = Harness::new(0);
    let script = flash_script(&harness.log, 0);
    let archive = zip_bytes(&[("flash.sh", script.as_slice())]);
    let mock_server = serve_archive("image.zip", archive).await;

    let report = run_pipeline(&harness.request(firmware_url(&mock_server)), &harness.config)
        .await
        .expect("pipeline should succeed");

    assert_eq!(report.format, ArchiveFormat::Zip);
    assert!(read_log(&harness.log).ends_with("fastboot -s SER123 reboot\n"));
}

#[tokio::test]
async fn test_404_stops_before_extraction() {
    let harness = Harness::new(0);
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = run_pipeline(&harness.request(mock_server.uri()), &harness.config)
        .await
        .expect_err("404 must fail");

    assert!(
        matches!(
            err,
            PipelineError::Download(DownloadError::HttpStatus { status: 404, .. })
        ),
        "got {err:?}"
    );
    assert_eq!(read_log(&harness.log), "");
    assert!(is_empty_dir(&harness.work_root));
}

#[tokio::test]
async fn test_unsupported_extension_is_rejected_and_cleaned_up() {
    let harness = Harness::new(0);
    let mock_server = serve_archive("image.tar.gz", b"gzip bytes".to_vec()).await;

    let err = run_pipeline(&harness.request(firmware_url(&mock_server)), &harness.config)
        .await
        .expect_err("tar.gz is unsupported");

    match err {
        PipelineError::Extract(ExtractError::UnsupportedExtension { extension, .. }) => {
            assert_eq!(extension, ".tar.gz");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(read_log(&harness.log), "");
    assert!(is_empty_dir(&harness.work_root));
}

#[tokio::test]
async fn test_missing_content_disposition_is_reported() {
    let harness = Harness::new(0);
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
        .mount(&mock_server)
        .await;

    let err = run_pipeline(&harness.request(mock_server.uri()), &harness.config)
        .await
        .expect_err("missing header must fail");

    assert!(
        matches!(
            err,
            PipelineError::Download(DownloadError::MissingContentDisposition { .. })
        ),
        "got {err:?}"
    );
    assert!(is_empty_dir(&harness.work_root));
}

#[tokio::test]
async fn test_missing_flash_script_skips_reboot() {
    let harness = Harness::new(0);
    let archive = tar_bz2_bytes(&[("README", b"no script here".as_slice())]);
    let mock_server = serve_archive("image.tar.bz2", archive).await;

    let err = run_pipeline(&harness.request(firmware_url(&mock_server)), &harness.config)
        .await
        .expect_err("missing script must fail");

    assert!(
        matches!(err, PipelineError::Flash(FlashError::ScriptNotFound { .. })),
        "got {err:?}"
    );
    assert_eq!(read_log(&harness.log), "", "reboot must not run");
    assert!(is_empty_dir(&harness.work_root));
}

#[tokio::test]
async fn test_failing_flash_script_skips_reboot() {
    let harness = Harness::new(0);
    let script = flash_script(&harness.log, 4);
    let archive = tar_bz2_bytes(&[("flash.sh", script.as_slice())]);
    let mock_server = serve_archive("image.tar.bz2", archive).await;

    let err = run_pipeline(&harness.request(firmware_url(&mock_server)), &harness.config)
        .await
        .expect_err("failing script must fail the run");

    match err {
        PipelineError::Flash(FlashError::CommandFailed { status, .. }) => {
            assert_eq!(status.code(), Some(4));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(read_log(&harness.log), "flash.sh --extra-opts -s SER123\n");
    assert!(is_empty_dir(&harness.work_root));
}

#[tokio::test]
async fn test_failing_reboot_fails_the_run() {
    let harness = Harness::new(1);
    let script = flash_script(&harness.log, 0);
    let archive = tar_bz2_bytes(&[("flash.sh", script.as_slice())]);
    let mock_server = serve_archive("image.tar.bz2", archive).await;

    let err = run_pipeline(&harness.request(firmware_url(&mock_server)), &harness.config)
        .await
        .expect_err("failing reboot must fail the run");

    assert!(
        matches!(err, PipelineError::Flash(FlashError::CommandFailed { .. })),
        "got {err:?}"
    );
    assert!(is_empty_dir(&harness.work_root));
}

#[tokio::test]
async fn test_custom_script_name() {
    let mut harness = Harness::new(0);
    harness.config.script_name = "install.sh".to_string();
    let script = flash_script(&harness.log, 0);
    let archive = tar_bz2_bytes(&[("install.sh", script.as_slice())]);
    let mock_server = serve_archive("image.tar.bz2", archive).await;

    let report = run_pipeline(&harness.request(firmware_url(&mock_server)), &harness.config)
        .await
        .expect("pipeline should succeed");

    assert_eq!(
        report.script_path.file_name().and_then(|n| n.to_str()),
        Some("install.sh")
    );
}

#[test]
fn test_malformed_credentials_rejected_before_any_request() {
    let err = FlashRequest::new("SER123", "http://127.0.0.1:9/firmware", "nocolon")
        .expect_err("credentials without separator");
    assert!(matches!(
        err,
        PipelineError::Credentials(CredentialsError::MissingSeparator)
    ));
}
