//! Resolved paths to the external device-control tools.
//!
//! Tool paths are resolved once into an explicit value that gets passed into the HAL;
//! nothing looks tools up ambiently mid-session.

use crate::{HalError, HalResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Paths to the external tools one session uses.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub adb: PathBuf,
    pub fastboot: PathBuf,
    /// Payload dumper is optional: flashing sessions never need it.
    pub payload_dumper: Option<PathBuf>,
}

impl Default for Toolchain {
    fn default() -> Self {
        // Bare names defer resolution to the OS at spawn time.
        Self {
            adb: PathBuf::from("adb"),
            fastboot: PathBuf::from("fastboot"),
            payload_dumper: None,
        }
    }
}

impl Toolchain {
    pub fn new(adb: PathBuf, fastboot: PathBuf) -> Self {
        Self {
            adb,
            fastboot,
            payload_dumper: None,
        }
    }

    pub fn with_payload_dumper(mut self, dumper: PathBuf) -> Self {
        self.payload_dumper = Some(dumper);
        self
    }

    /// Locate `adb` and `fastboot` on the given PATH string, falling back to a bundled
    /// tools directory when provided.
    pub fn locate(path_env: &str, bundled_dir: Option<&Path>) -> HalResult<Self> {
        let adb = locate_tool("adb", path_env, bundled_dir)
            .ok_or_else(|| HalError::CommandNotFound("adb".to_string()))?;
        let fastboot = locate_tool("fastboot", path_env, bundled_dir)
            .ok_or_else(|| HalError::CommandNotFound("fastboot".to_string()))?;
        Ok(Self {
            adb,
            fastboot,
            payload_dumper: None,
        })
    }
}

/// PATH search first, bundled directory second.
pub fn locate_tool(name: &str, path_env: &str, bundled_dir: Option<&Path>) -> Option<PathBuf> {
    let file_name = format!("{}{}", name, std::env::consts::EXE_SUFFIX);
    for dir in path_env.split(':').filter(|dir| !dir.is_empty()) {
        let candidate = Path::new(dir).join(&file_name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    let candidate = bundled_dir?.join(&file_name);
    if is_executable(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}
