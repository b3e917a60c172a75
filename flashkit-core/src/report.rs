//! Session report artifact.
//!
//! Ordered per-partition outcomes plus the overall session status, optionally persisted
//! as JSON for scripting around the CLI.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Mode the device ended up in for the flashing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachedMode {
    Bootloader,
    Fastbootd,
}

impl fmt::Display for ReachedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReachedMode::Bootloader => write!(f, "bootloader"),
            ReachedMode::Fastbootd => write!(f, "fastbootd"),
        }
    }
}

/// Result of one partition flash attempt. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashOutcome {
    pub partition: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Completed,
    AbortedUnreachable,
    AbortedNoDirectory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ReachedMode>,
    pub outcomes: Vec<FlashOutcome>,
}

impl SessionReport {
    /// Report for a session that never touched a partition.
    pub fn aborted(status: SessionStatus) -> Self {
        Self {
            status,
            mode: None,
            outcomes: Vec::new(),
        }
    }

    pub fn completed(mode: ReachedMode, outcomes: Vec<FlashOutcome>) -> Self {
        Self {
            status: SessionStatus::Completed,
            mode: Some(mode),
            outcomes,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded).count()
    }

    /// True when the session ran to completion and every partition flashed.
    pub fn all_succeeded(&self) -> bool {
        self.status == SessionStatus::Completed && self.failed_count() == 0
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Unable to serialize session report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Unable to write report to {}", path.display()))?;
        Ok(())
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            SessionStatus::AbortedUnreachable => write!(f, "aborted: device unreachable"),
            SessionStatus::AbortedNoDirectory => write!(f, "aborted: image directory missing"),
            SessionStatus::Completed => write!(
                f,
                "completed: {}/{} partitions flashed",
                self.outcomes.len() - self.failed_count(),
                self.outcomes.len()
            ),
        }
    }
}
