//! Real HAL implementation shelling out to adb, fastboot, and the payload dumper.

use super::{DeviceOps, ExtractOps, RebootTarget};
use crate::process::{output_failed, output_with_timeout, status_with_timeout};
use crate::{HalError, HalResult, Toolchain};
use std::path::Path;
use std::process::Command;
use std::time::Duration;

const DEVICES_TIMEOUT: Duration = Duration::from_secs(10);
const REBOOT_TIMEOUT: Duration = Duration::from_secs(30);
const FLASH_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const EXTRACT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Real implementation driving a physical device over USB.
#[derive(Debug, Clone)]
pub struct FastbootHal {
    tools: Toolchain,
}

impl FastbootHal {
    pub fn new(tools: Toolchain) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &Toolchain {
        &self.tools
    }
}

impl DeviceOps for FastbootHal {
    fn list_devices(&self) -> HalResult<Vec<String>> {
        let mut cmd = Command::new(&self.tools.fastboot);
        cmd.arg("devices");
        let output = output_with_timeout("fastboot", &mut cmd, DEVICES_TIMEOUT)?;
        if !output.status.success() {
            return Err(output_failed("fastboot", &output));
        }
        // One device per line: "<serial>\tfastboot".
        let stdout = String::from_utf8(output.stdout)?;
        Ok(stdout
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .map(|serial| serial.to_string())
            .collect())
    }

    fn reboot_to(&self, target: RebootTarget) -> HalResult<()> {
        log::info!("🔄 adb reboot {}", target.adb_arg());
        let mut cmd = Command::new(&self.tools.adb);
        cmd.args(["reboot", target.adb_arg()]);
        status_with_timeout("adb", &mut cmd, REBOOT_TIMEOUT)
    }

    fn flash_partition(&self, partition: &str, image: &Path) -> HalResult<()> {
        let mut cmd = Command::new(&self.tools.fastboot);
        cmd.arg("flash").arg(partition).arg(image);
        status_with_timeout("fastboot", &mut cmd, FLASH_TIMEOUT)
    }
}

impl ExtractOps for FastbootHal {
    fn extract_payload(&self, archive: &Path, output_dir: &Path) -> HalResult<()> {
        let dumper = self
            .tools
            .payload_dumper
            .as_ref()
            .ok_or_else(|| HalError::CommandNotFound("payload-dumper-go".to_string()))?;
        let mut cmd = Command::new(dumper);
        cmd.arg("-o").arg(output_dir).arg(archive);
        status_with_timeout("payload-dumper-go", &mut cmd, EXTRACT_TIMEOUT)
    }
}
