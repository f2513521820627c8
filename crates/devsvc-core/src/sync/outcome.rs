//! Result types for sync and inspect

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What a sync call did to the managed resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Sync is disabled; nothing was read or written
    SkippedDisabled,
    /// The target did not exist and was created
    Extracted,
    /// The target already holds the bundled content
    UpToDate {
        /// The marker was rewritten because it did not record the bundled hash
        marker_refreshed: bool,
    },
    /// An unedited, outdated target was replaced
    AutoUpdated,
    /// A manually edited target was backed up and replaced
    ForceUpdated { backup: PathBuf },
    /// A manually edited target was left alone
    SkippedManualEdit,
    /// An unedited, outdated target was left alone because auto-update is off
    SkippedStale,
}

impl SyncOutcome {
    /// Whether the target file was (re)written.
    pub fn wrote_target(&self) -> bool {
        matches!(
            self,
            Self::Extracted | Self::AutoUpdated | Self::ForceUpdated { .. }
        )
    }

    /// Whether the target now holds the bundled content.
    pub fn is_current(&self) -> bool {
        self.wrote_target() || matches!(self, Self::UpToDate { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedDisabled => write!(f, "skipped (disabled)"),
            Self::Extracted => write!(f, "extracted"),
            Self::UpToDate { .. } => write!(f, "up-to-date"),
            Self::AutoUpdated => write!(f, "auto-updated"),
            Self::ForceUpdated { backup } => {
                write!(f, "force-updated (backup: {})", backup.display())
            }
            Self::SkippedManualEdit => write!(f, "skipped (manual edit preserved)"),
            Self::SkippedStale => write!(f, "skipped (outdated, auto-update disabled)"),
        }
    }
}

/// Report from a sync call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    pub outcome: SyncOutcome,
    pub target_path: PathBuf,
    pub marker_path: PathBuf,
    /// Hash of the bundled content
    pub bundled_hash: String,
    /// Hash of the target before this call, if it existed
    pub previous_hash: Option<String>,
}

/// Where a target stands relative to its marker and the bundled content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    /// The target does not exist
    Absent,
    /// The target holds the bundled content
    InSync,
    /// The target matches its marker but not the bundled content
    Stale,
    /// The target does not match its marker, or has none
    ManuallyEdited,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Absent => "absent",
            Self::InSync => "in sync",
            Self::Stale => "outdated",
            Self::ManuallyEdited => "manually edited",
        };
        f.write_str(label)
    }
}

/// Read-only view of a managed resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceReport {
    pub status: ResourceStatus,
    pub target_path: PathBuf,
    pub marker_path: PathBuf,
    pub bundled_hash: String,
    pub current_hash: Option<String>,
    pub recorded_hash: Option<String>,
    /// Existing backups, oldest first
    pub backups: Vec<PathBuf>,
}
