//! Fake HAL implementation for testing.
//!
//! This implementation records all operations without touching a device and plays back
//! scripted outcomes, allowing the mode state machine and flashing loop to run in CI.

use super::{DeviceOps, ExtractOps, RebootTarget};
use crate::{HalError, HalResult};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ListDevices,
    Reboot {
        target: RebootTarget,
    },
    FlashPartition {
        partition: String,
        image: PathBuf,
    },
    ExtractPayload {
        archive: PathBuf,
        output_dir: PathBuf,
    },
}

/// Shared state for FakeHal operations.
#[derive(Debug, Default)]
struct FakeHalState {
    /// All operations that were recorded.
    operations: Vec<Operation>,
    /// Serials currently visible in fastboot mode.
    connected: Vec<String>,
    /// Serials that become visible after a given reboot target (empty vec = vanish).
    after_reboot: HashMap<RebootTarget, Vec<String>>,
    /// Partitions whose flash is scripted to fail.
    failing_partitions: HashSet<String>,
    /// Reboot targets whose command is scripted to fail.
    failing_reboots: HashSet<RebootTarget>,
    /// Scripted extraction diagnostic, if extraction should fail.
    extract_error: Option<String>,
}

/// Fake HAL that records operations and plays back scripted outcomes.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the device as currently visible with the given serials.
    pub fn set_connected(&self, serials: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.connected = serials.iter().map(|s| s.to_string()).collect();
    }

    /// Script the serials visible after a reboot to `target` completes.
    /// An empty slice makes the device vanish instead.
    pub fn connect_after_reboot(&self, target: RebootTarget, serials: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state
            .after_reboot
            .insert(target, serials.iter().map(|s| s.to_string()).collect());
    }

    /// Script the flash of `partition` to fail.
    pub fn fail_partition(&self, partition: &str) {
        let mut state = self.state.lock().unwrap();
        state.failing_partitions.insert(partition.to_string());
    }

    /// Script the reboot command to `target` to fail.
    pub fn fail_reboot(&self, target: RebootTarget) {
        let mut state = self.state.lock().unwrap();
        state.failing_reboots.insert(target);
    }

    /// Script payload extraction to fail with the given diagnostic.
    pub fn fail_extract(&self, detail: &str) {
        let mut state = self.state.lock().unwrap();
        state.extract_error = Some(detail.to_string());
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state.lock().unwrap().operations.len()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state.lock().unwrap().operations.iter().any(check)
    }

    /// Count flash attempts recorded so far.
    pub fn flash_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::FlashPartition { .. }))
            .count()
    }

    /// Clear all recorded operations and scripted outcomes.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        *state = FakeHalState::default();
    }
}

impl DeviceOps for FakeHal {
    fn list_devices(&self) -> HalResult<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(Operation::ListDevices);
        Ok(state.connected.clone())
    }

    fn reboot_to(&self, target: RebootTarget) -> HalResult<()> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(Operation::Reboot { target });
        if state.failing_reboots.contains(&target) {
            return Err(HalError::CommandFailed {
                program: "adb".to_string(),
                code: Some(1),
                stderr: "error: no devices/emulators found".to_string(),
            });
        }
        if let Some(serials) = state.after_reboot.get(&target) {
            state.connected = serials.clone();
        }
        Ok(())
    }

    fn flash_partition(&self, partition: &str, image: &Path) -> HalResult<()> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(Operation::FlashPartition {
            partition: partition.to_string(),
            image: image.to_path_buf(),
        });
        if state.failing_partitions.contains(partition) {
            return Err(HalError::CommandFailed {
                program: "fastboot".to_string(),
                code: Some(1),
                stderr: format!("FAILED (remote: '{}' partition error)", partition),
            });
        }
        Ok(())
    }
}

impl ExtractOps for FakeHal {
    fn extract_payload(&self, archive: &Path, output_dir: &Path) -> HalResult<()> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(Operation::ExtractPayload {
            archive: archive.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
        });
        if let Some(detail) = state.extract_error.clone() {
            return Err(HalError::Other(detail));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_hal_records_flash() {
        let hal = FakeHal::new();
        hal.flash_partition("boot", Path::new("/tmp/boot.img")).unwrap();

        assert_eq!(hal.operation_count(), 1);
        assert!(hal.has_operation(
            |op| matches!(op, Operation::FlashPartition { partition, .. } if partition == "boot")
        ));
    }

    #[test]
    fn scripted_partition_failure_carries_diagnostic() {
        let hal = FakeHal::new();
        hal.fail_partition("vendor");

        let err = hal
            .flash_partition("vendor", Path::new("/tmp/vendor.img"))
            .unwrap_err();
        assert!(err.to_string().contains("vendor"));
    }

    #[test]
    fn reboot_script_changes_visibility() {
        let hal = FakeHal::new();
        assert!(hal.list_devices().unwrap().is_empty());

        hal.connect_after_reboot(RebootTarget::Bootloader, &["SERIAL1"]);
        hal.reboot_to(RebootTarget::Bootloader).unwrap();

        assert_eq!(hal.list_devices().unwrap(), vec!["SERIAL1".to_string()]);
    }

    #[test]
    fn scripted_reboot_failure() {
        let hal = FakeHal::new();
        hal.fail_reboot(RebootTarget::Fastbootd);

        let err = hal.reboot_to(RebootTarget::Fastbootd).unwrap_err();
        assert!(matches!(err, HalError::CommandFailed { .. }));
        // The failed command is still recorded.
        assert!(hal.has_operation(|op| {
            matches!(
                op,
                Operation::Reboot {
                    target: RebootTarget::Fastbootd
                }
            )
        }));
    }

    #[test]
    fn scripted_extract_failure() {
        let hal = FakeHal::new();
        hal.fail_extract("bad magic");

        let err = hal
            .extract_payload(Path::new("payload.bin"), Path::new("out"))
            .unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn fake_hal_can_clear() {
        let hal = FakeHal::new();
        hal.set_connected(&["SERIAL1"]);
        hal.reboot_to(RebootTarget::Bootloader).unwrap();
        assert_eq!(hal.operation_count(), 1);

        hal.clear();

        assert_eq!(hal.operation_count(), 0);
        assert!(hal.list_devices().unwrap().is_empty());
    }
}
