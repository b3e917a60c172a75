//! HAL trait definitions and implementations.
//!
//! This module defines the capability traits for device control and payload
//! extraction and provides both real (FastbootHal) and fake (FakeHal) implementations.

pub mod device_ops;
pub mod extract_ops;
pub mod fake_hal;
pub mod fastboot_hal;

pub use device_ops::{DeviceOps, RebootTarget};
pub use extract_ops::ExtractOps;
pub use fake_hal::{FakeHal, Operation};
pub use fastboot_hal::FastbootHal;

/// Complete HAL combining device control and payload extraction.
pub trait DeviceHal: DeviceOps + ExtractOps + Send + Sync {}

/// Automatically implement DeviceHal for any type implementing both traits.
impl<T> DeviceHal for T where T: DeviceOps + ExtractOps + Send + Sync {}
