//! Device mode state machine.
//!
//! Gets the device into the mode flashing requires. Reboots are asynchronous from our
//! side (the device drops off the bus and comes back on its own), so every transition is
//! "issue the command, then poll until the device re-appears or the settle timeout
//! elapses".

use crate::clock::Clock;
use flashkit_core::errors::FlashError;
use flashkit_core::report::ReachedMode;
use flashkit_hal::{DeviceOps, RebootTarget};
use log::{info, warn};
use std::time::Duration;

/// Polling policy for post-reboot reconnection.
#[derive(Debug, Clone)]
pub struct ModeSettings {
    pub poll_interval: Duration,
    pub settle_timeout: Duration,
}

impl Default for ModeSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            settle_timeout: Duration::from_secs(60),
        }
    }
}

pub struct DeviceModeController<'a> {
    hal: &'a dyn DeviceOps,
    clock: &'a dyn Clock,
    settings: ModeSettings,
}

impl<'a> DeviceModeController<'a> {
    pub fn new(hal: &'a dyn DeviceOps, clock: &'a dyn Clock, settings: ModeSettings) -> Self {
        Self {
            hal,
            clock,
            settings,
        }
    }

    /// Ensure the device is reachable in the mode flashing requires.
    ///
    /// A session that wants dynamic partitions gets exactly one escalation attempt into
    /// fastbootd; there are no other retries.
    pub fn ensure_mode(&self, dynamic_partitions: bool) -> Result<ReachedMode, FlashError> {
        if !self.probe() {
            info!("🔄 Device not in fastboot mode; rebooting to bootloader...");
            self.hal.reboot_to(RebootTarget::Bootloader).map_err(|err| {
                warn!("adb reboot bootloader failed: {}", err);
                FlashError::DeviceUnreachable
            })?;
            if !self.wait_for_device() {
                return Err(FlashError::DeviceUnreachable);
            }
        }

        if !dynamic_partitions {
            return Ok(ReachedMode::Bootloader);
        }

        info!("🔄 Rebooting to fastbootd for dynamic partitions...");
        self.hal.reboot_to(RebootTarget::Fastbootd).map_err(|err| {
            warn!("adb reboot fastboot failed: {}", err);
            FlashError::ModeEscalationFailed
        })?;
        if !self.wait_for_device() {
            return Err(FlashError::ModeEscalationFailed);
        }
        Ok(ReachedMode::Fastbootd)
    }

    /// Live connectivity probe. A broken `fastboot devices` counts as not connected.
    fn probe(&self) -> bool {
        match self.hal.list_devices() {
            Ok(serials) => !serials.is_empty(),
            Err(err) => {
                warn!("fastboot devices failed: {}", err);
                false
            }
        }
    }

    /// Bounded polling: probe at `poll_interval` until the device re-appears or
    /// `settle_timeout` elapses.
    fn wait_for_device(&self) -> bool {
        let deadline = self.clock.now() + self.settings.settle_timeout;
        loop {
            // The device is mid-reboot; probing immediately is pointless.
            self.clock.sleep(self.settings.poll_interval);
            if self.probe() {
                return true;
            }
            if self.clock.now() >= deadline {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use flashkit_hal::{FakeHal, Operation};

    fn fast_settings() -> ModeSettings {
        ModeSettings {
            poll_interval: Duration::from_secs(2),
            settle_timeout: Duration::from_secs(60),
        }
    }

    #[test]
    fn connected_device_needs_no_reboot() {
        let hal = FakeHal::new();
        hal.set_connected(&["SERIAL1"]);
        let clock = FakeClock::new();
        let controller = DeviceModeController::new(&hal, &clock, fast_settings());

        let mode = controller.ensure_mode(false).unwrap();

        assert_eq!(mode, ReachedMode::Bootloader);
        assert!(!hal.has_operation(|op| matches!(op, Operation::Reboot { .. })));
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn disconnected_device_is_rebooted_and_polled() {
        let hal = FakeHal::new();
        hal.connect_after_reboot(RebootTarget::Bootloader, &["SERIAL1"]);
        let clock = FakeClock::new();
        let controller = DeviceModeController::new(&hal, &clock, fast_settings());

        let mode = controller.ensure_mode(false).unwrap();

        assert_eq!(mode, ReachedMode::Bootloader);
        assert!(hal.has_operation(|op| {
            matches!(
                op,
                Operation::Reboot {
                    target: RebootTarget::Bootloader
                }
            )
        }));
        // One poll interval was enough for the scripted reconnection.
        assert_eq!(clock.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn unreachable_when_device_never_reappears() {
        let hal = FakeHal::new();
        let clock = FakeClock::new();
        let controller = DeviceModeController::new(&hal, &clock, fast_settings());

        let err = controller.ensure_mode(false).unwrap_err();

        assert!(matches!(err, FlashError::DeviceUnreachable));
        // Polling is bounded: we waited the settle timeout, not forever.
        assert!(clock.elapsed() >= Duration::from_secs(60));
        assert!(clock.elapsed() < Duration::from_secs(60 + 4));
    }

    #[test]
    fn failed_reboot_command_is_unreachable_without_polling() {
        let hal = FakeHal::new();
        hal.fail_reboot(RebootTarget::Bootloader);
        let clock = FakeClock::new();
        let controller = DeviceModeController::new(&hal, &clock, fast_settings());

        let err = controller.ensure_mode(false).unwrap_err();

        assert!(matches!(err, FlashError::DeviceUnreachable));
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn escalation_only_happens_when_requested() {
        let hal = FakeHal::new();
        hal.set_connected(&["SERIAL1"]);
        let clock = FakeClock::new();
        let controller = DeviceModeController::new(&hal, &clock, fast_settings());

        controller.ensure_mode(false).unwrap();

        assert!(!hal.has_operation(|op| {
            matches!(
                op,
                Operation::Reboot {
                    target: RebootTarget::Fastbootd
                }
            )
        }));
    }

    #[test]
    fn escalation_reaches_fastbootd() {
        let hal = FakeHal::new();
        hal.set_connected(&["SERIAL1"]);
        hal.connect_after_reboot(RebootTarget::Fastbootd, &["SERIAL1"]);
        let clock = FakeClock::new();
        let controller = DeviceModeController::new(&hal, &clock, fast_settings());

        let mode = controller.ensure_mode(true).unwrap();

        assert_eq!(mode, ReachedMode::Fastbootd);
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
    fn escalation_failure_when_device_vanishes() {
        let hal = FakeHal::new();
        hal.set_connected(&["SERIAL1"]);
        // Device never comes back after the fastbootd reboot.
        hal.connect_after_reboot(RebootTarget::Fastbootd, &[]);
        let clock = FakeClock::new();
        let controller = DeviceModeController::new(&hal, &clock, fast_settings());

        let err = controller.ensure_mode(true).unwrap_err();

        assert!(matches!(err, FlashError::ModeEscalationFailed));
    }

    #[test]
    fn escalation_failure_when_reboot_command_fails() {
        let hal = FakeHal::new();
        hal.set_connected(&["SERIAL1"]);
        hal.fail_reboot(RebootTarget::Fastbootd);
        let clock = FakeClock::new();
        let controller = DeviceModeController::new(&hal, &clock, fast_settings());

        let err = controller.ensure_mode(true).unwrap_err();

        assert!(matches!(err, FlashError::ModeEscalationFailed));
    }
}
