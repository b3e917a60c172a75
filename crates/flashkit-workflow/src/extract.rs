//! Payload extraction workflow.
//!
//! One invocation of the external dumper per run; a partial extraction is never resumed.
//! Extraction is independent of device state and never talks to the device.

use flashkit_core::errors::FlashError;
use flashkit_hal::ExtractOps;
use log::info;
use std::path::Path;

pub fn run_extract(
    hal: &dyn ExtractOps,
    archive: &Path,
    output_dir: &Path,
) -> Result<(), FlashError> {
    if !archive.is_file() {
        return Err(FlashError::ExtractionFailed(format!(
            "payload archive not found: {}",
            archive.display()
        )));
    }

    std::fs::create_dir_all(output_dir).map_err(|err| {
        FlashError::ExtractionFailed(format!(
            "unable to create output directory {}: {}",
            output_dir.display(),
            err
        ))
    })?;

    info!(
        "📦 Extracting {} -> {}",
        archive.display(),
        output_dir.display()
    );
    hal.extract_payload(archive, output_dir)
        .map_err(|err| FlashError::ExtractionFailed(err.to_string()))?;

    info!("✅ Extraction complete; images saved to {}", output_dir.display());
    Ok(())
}
