use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for flashkit operations.
pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug)]
pub enum FlashError {
    #[error("Required tool unavailable: {0}")]
    ToolUnavailable(String),

    #[error("Image directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Device not detected. Connect it with USB debugging enabled, or enter fastboot mode manually.")]
    DeviceUnreachable,

    #[error("Device did not come back in fastbootd mode; dynamic partitions cannot be flashed")]
    ModeEscalationFailed,

    #[error("Flashing partition '{partition}' failed: {detail}")]
    PartitionFlashFailed { partition: String, detail: String },

    #[error("Payload extraction failed: {0}")]
    ExtractionFailed(String),
}
