//! Running the bundled flash script and rebooting the device.
//!
//! After extraction the scratch directory must contain the flash script
//! (`flash.sh` by default). It is made executable and run as
//! `<script> --extra-opts -s <serial>`, then the device is rebooted with
//! `fastboot -s <serial> reboot`. Both exit statuses are checked.

mod error;
mod runner;

pub use error::FlashError;
pub use runner::FlashRunner;

/// Script expected at the root of every firmware archive.
pub const DEFAULT_SCRIPT_NAME: &str = "flash.sh";

/// Device-management binary used for the reboot.
pub const DEFAULT_FASTBOOT_PROGRAM: &str = "fastboot";

/// Fixed flag passed to the flash script ahead of the device selector.
pub const EXTRA_OPTS_FLAG: &str = "--extra-opts";

/// Device selector flag shared by the flash script and fastboot.
pub const DEVICE_SELECTOR_FLAG: &str = "-s";
