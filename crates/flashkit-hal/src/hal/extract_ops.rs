//! Payload extraction operations trait.

use crate::HalResult;
use std::path::Path;

/// Trait for unpacking an update payload archive.
///
/// The archive's internal format is the dumper tool's business; callers only see
/// success or a diagnostic.
pub trait ExtractOps {
    fn extract_payload(&self, archive: &Path, output_dir: &Path) -> HalResult<()>;
}
