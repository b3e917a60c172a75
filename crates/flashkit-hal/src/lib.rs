//! flashkit hardware abstraction layer.
//!
//! External commands are considered "world-touching" and must go through the HAL so the
//! mode state machine and flashing loop can be tested without real hardware or binaries.

pub mod error;
pub mod hal;
pub mod process;
pub mod toolchain;

pub use error::{HalError, HalResult};
pub use hal::{DeviceHal, DeviceOps, ExtractOps, FakeHal, FastbootHal, Operation, RebootTarget};
pub use toolchain::Toolchain;
