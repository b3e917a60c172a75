//! End-to-end flash session.
//!
//! Mode readiness is an all-or-nothing gate: if the device cannot be brought into the
//! required mode, zero partitions are touched. Per-partition failures inside the flashing
//! phase are recorded and non-fatal.

use crate::clock::Clock;
use crate::device_mode::{DeviceModeController, ModeSettings};
use crate::partition_flash::PartitionFlasher;
use flashkit_core::report::{SessionReport, SessionStatus};
use flashkit_hal::DeviceOps;
use log::{info, warn};
use std::path::PathBuf;

/// Configuration for one flash session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub image_dir: PathBuf,
    pub dynamic_partitions: bool,
    pub mode: ModeSettings,
}

impl SessionConfig {
    pub fn new(image_dir: PathBuf, dynamic_partitions: bool) -> Self {
        Self {
            image_dir,
            dynamic_partitions,
            mode: ModeSettings::default(),
        }
    }
}

/// Run the full flash-image-set operation.
pub fn run_full_flash(
    hal: &dyn DeviceOps,
    clock: &dyn Clock,
    config: &SessionConfig,
) -> SessionReport {
    let controller = DeviceModeController::new(hal, clock, config.mode.clone());
    let mode = match controller.ensure_mode(config.dynamic_partitions) {
        Ok(mode) => mode,
        Err(err) => {
            warn!("🛑 {}", err);
            return SessionReport::aborted(SessionStatus::AbortedUnreachable);
        }
    };
    info!("🔌 Device ready in {} mode", mode);

    let flasher = PartitionFlasher::new(hal, clock);
    match flasher.flash_all(&config.image_dir) {
        Ok(outcomes) => SessionReport::completed(mode, outcomes),
        Err(err) => {
            warn!("🛑 {}", err);
            SessionReport::aborted(SessionStatus::AbortedNoDirectory)
        }
    }
}
