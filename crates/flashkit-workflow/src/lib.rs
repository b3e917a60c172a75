//! flashkit workflow orchestration.
//!
//! Composes the HAL into the user-facing operations: getting the device into the mode
//! flashing requires, flashing a directory of images, and payload extraction.

pub mod clock;
pub mod device_mode;
pub mod extract;
pub mod partition_flash;
pub mod session;
