//! Device control operations trait.

use crate::HalResult;
use std::path::Path;

/// Reboot destinations understood by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebootTarget {
    /// Plain bootloader fastboot mode.
    Bootloader,
    /// Userspace fastbootd, required for dynamic (logical) partitions.
    Fastbootd,
}

impl RebootTarget {
    /// Mode name as passed to `adb reboot`.
    pub fn adb_arg(self) -> &'static str {
        match self {
            RebootTarget::Bootloader => "bootloader",
            RebootTarget::Fastbootd => "fastboot",
        }
    }
}

/// Trait for talking to the attached device.
///
/// At most one device is assumed attached; connectivity is re-queried live before
/// every mode-dependent action rather than cached.
pub trait DeviceOps {
    /// Serials of devices currently visible in fastboot mode.
    fn list_devices(&self) -> HalResult<Vec<String>>;

    /// Issue a reboot command. The device drops off the bus and reconnects
    /// out-of-band; callers must re-probe.
    fn reboot_to(&self, target: RebootTarget) -> HalResult<()>;

    /// Flash one image onto the named partition.
    fn flash_partition(&self, partition: &str, image: &Path) -> HalResult<()>;
}
