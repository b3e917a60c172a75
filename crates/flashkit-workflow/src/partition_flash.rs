//! Partition flashing loop.
//!
//! Every `<name>.img` in the image directory is flashed onto the partition named by its
//! file stem. One bad partition never stops the rest: a user recovering from a bad flash
//! needs the full result set, not the first problem.

use crate::clock::Clock;
use flashkit_core::errors::FlashError;
use flashkit_core::report::FlashOutcome;
use flashkit_hal::DeviceOps;
use log::{info, warn};
use std::path::Path;
use std::time::Duration;

/// File extension marking a flashable partition image.
pub const IMAGE_EXTENSION: &str = "img";

/// Pause after each successful flash so the device's flashing subsystem is not
/// overwhelmed.
const POST_FLASH_PAUSE: Duration = Duration::from_secs(1);

/// Partition name for a candidate file: the file name with the image extension stripped.
/// `None` for files that are not partition images.
pub fn partition_name(file_name: &str) -> Option<&str> {
    let stem = file_name
        .strip_suffix(IMAGE_EXTENSION)?
        .strip_suffix('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(stem)
}

pub struct PartitionFlasher<'a> {
    hal: &'a dyn DeviceOps,
    clock: &'a dyn Clock,
}

impl<'a> PartitionFlasher<'a> {
    pub fn new(hal: &'a dyn DeviceOps, clock: &'a dyn Clock) -> Self {
        Self { hal, clock }
    }

    /// Flash every eligible image in `image_dir`, in directory-listing order.
    ///
    /// Files without the image extension are silently skipped. A failed partition is
    /// recorded and the loop continues with the remaining candidates.
    pub fn flash_all(&self, image_dir: &Path) -> Result<Vec<FlashOutcome>, FlashError> {
        let entries = std::fs::read_dir(image_dir)
            .map_err(|_| FlashError::DirectoryNotFound(image_dir.to_path_buf()))?;

        let mut outcomes = Vec::new();
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let file_name = match file_name.to_str() {
                Some(name) => name,
                None => continue,
            };
            let partition = match partition_name(file_name) {
                Some(name) => name,
                None => continue,
            };
            let path = entry.path();

            info!("💾 Flashing partition {} from {}", partition, path.display());
            match self.hal.flash_partition(partition, &path) {
                Ok(()) => {
                    info!("✅ Partition {} flashed", partition);
                    outcomes.push(FlashOutcome {
                        partition: partition.to_string(),
                        succeeded: true,
                        error: None,
                    });
                    self.clock.sleep(POST_FLASH_PAUSE);
                }
                Err(err) => {
                    let detail = err.to_string();
                    warn!(
                        "⚠️  {}",
                        FlashError::PartitionFlashFailed {
                            partition: partition.to_string(),
                            detail: detail.clone(),
                        }
                    );
                    outcomes.push(FlashOutcome {
                        partition: partition.to_string(),
                        succeeded: false,
                        error: Some(detail),
                    });
                }
            }
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use flashkit_hal::FakeHal;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"\0").unwrap();
    }

    #[test]
    fn partition_name_strips_image_extension() {
        assert_eq!(partition_name("boot.img"), Some("boot"));
        assert_eq!(partition_name("vendor_boot.img"), Some("vendor_boot"));
        assert_eq!(partition_name("readme.txt"), None);
        assert_eq!(partition_name("img"), None);
        assert_eq!(partition_name(".img"), None);
    }

    #[test]
    fn only_image_files_are_flashed() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "boot.img");
        touch(tmp.path(), "dtbo.img");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "checksums.sha256");

        let hal = FakeHal::new();
        let clock = FakeClock::new();
        let flasher = PartitionFlasher::new(&hal, &clock);

        let outcomes = flasher.flash_all(tmp.path()).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(hal.flash_count(), 2);
        assert!(outcomes.iter().all(|o| o.succeeded));
    }

    #[test]
    fn missing_directory_produces_no_outcomes() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("nope");

        let hal = FakeHal::new();
        let clock = FakeClock::new();
        let flasher = PartitionFlasher::new(&hal, &clock);

        let err = flasher.flash_all(&missing).unwrap_err();

        assert!(matches!(err, FlashError::DirectoryNotFound(_)));
        assert_eq!(hal.flash_count(), 0);
    }

    #[test]
    fn one_failure_does_not_stop_the_loop() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "a.img");
        touch(tmp.path(), "b.img");
        touch(tmp.path(), "c.img");

        let hal = FakeHal::new();
        hal.fail_partition("b");
        let clock = FakeClock::new();
        let flasher = PartitionFlasher::new(&hal, &clock);

        let outcomes = flasher.flash_all(tmp.path()).unwrap();

        assert_eq!(outcomes.len(), 3);
        let by_name = |name: &str| outcomes.iter().find(|o| o.partition == name).unwrap();
        assert!(by_name("a").succeeded);
        assert!(by_name("c").succeeded);
        let failed = by_name("b");
        assert!(!failed.succeeded);
        assert!(failed.error.as_ref().unwrap().contains("FAILED"));
    }

    #[test]
    fn pauses_only_after_successful_flashes() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "a.img");
        touch(tmp.path(), "b.img");
        touch(tmp.path(), "c.img");

        let hal = FakeHal::new();
        hal.fail_partition("b");
        let clock = FakeClock::new();
        let flasher = PartitionFlasher::new(&hal, &clock);

        flasher.flash_all(tmp.path()).unwrap();

        // Two successes, one failure: two rate-limit pauses.
        assert_eq!(clock.elapsed(), Duration::from_secs(2));
    }
}
