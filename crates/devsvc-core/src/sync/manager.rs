//! ResourceSyncManager implementation
//!
//! Decides, per call, whether a managed resource is extracted, left alone,
//! auto-updated or force-updated with a backup. The decision compares three
//! hashes: the file on disk, the one recorded in the marker, and the bundled
//! content.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use devsvc_fs::{RobustnessConfig, compute_file_hash, io};

use crate::backup;
use crate::config::SyncPolicy;
use crate::resource::{ManagedResource, VersionMarker};
use crate::{Error, Result};

use super::outcome::{ResourceReport, ResourceStatus, SyncOutcome, SyncResult};

/// Synchronizes bundled resources into their target directories.
///
/// Not safe for concurrent use against the same target directory from several
/// processes: the read-hash/write sequence is not guarded by a lock.
pub struct ResourceSyncManager {
    robustness: RobustnessConfig,
    clock: fn() -> DateTime<Local>,
}

impl Default for ResourceSyncManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSyncManager {
    pub fn new() -> Self {
        Self {
            robustness: RobustnessConfig::default(),
            clock: Local::now,
        }
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    /// Override the clock used for backup timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Synchronize `resource` according to `policy`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyResource`] if the bundled content is empty, whatever the
    ///   policy, or if the target is empty once the decision has been applied
    /// - [`Error::SyncFailure`] for any filesystem failure, including a target
    ///   path occupied by something other than a regular file
    pub fn sync(&self, resource: &ManagedResource, policy: &SyncPolicy) -> Result<SyncResult> {
        let target = resource.target_path();
        let marker_path = resource.marker_path();

        if resource.bundled_content().is_empty() {
            return Err(Error::EmptyResource { path: target });
        }
        let bundled_hash = resource.bundled_hash();

        if !policy.enabled {
            tracing::debug!(target = %target.display(), "Resource sync disabled");
            return Ok(SyncResult {
                outcome: SyncOutcome::SkippedDisabled,
                target_path: target,
                marker_path,
                bundled_hash,
                previous_hash: None,
            });
        }

        io::ensure_dir(resource.target_dir()).map_err(Error::sync_failure)?;

        let (outcome, previous_hash) = if fs::symlink_metadata(&target).is_err() {
            self.write_resource(resource, &bundled_hash)?;
            tracing::info!(target = %target.display(), "Extracted bundled resource");
            (SyncOutcome::Extracted, None)
        } else {
            let current_hash = current_hash(&target)?;
            let outcome = self.reconcile(resource, policy, &current_hash, &bundled_hash)?;
            (outcome, Some(current_hash))
        };

        ensure_not_empty(&target)?;

        Ok(SyncResult {
            outcome,
            target_path: target,
            marker_path,
            bundled_hash,
            previous_hash,
        })
    }

    fn reconcile(
        &self,
        resource: &ManagedResource,
        policy: &SyncPolicy,
        current_hash: &str,
        bundled_hash: &str,
    ) -> Result<SyncOutcome> {
        let target = resource.target_path();
        let marker_path = resource.marker_path();

        let recorded = VersionMarker::load(&marker_path).map_err(Error::sync_failure)?;
        let recorded_hash = recorded.as_ref().map(VersionMarker::content_hash);
        let manually_edited = recorded_hash != Some(current_hash);

        tracing::debug!(
            target = %target.display(),
            current = current_hash,
            recorded = recorded_hash.unwrap_or("<none>"),
            bundled = bundled_hash,
            manually_edited,
            "Reconciling managed resource"
        );

        if current_hash == bundled_hash {
            let marker_refreshed = recorded_hash != Some(bundled_hash);
            if marker_refreshed {
                self.write_marker(&marker_path, bundled_hash)?;
                tracing::debug!(marker = %marker_path.display(), "Refreshed stale version marker");
            }
            return Ok(SyncOutcome::UpToDate { marker_refreshed });
        }

        if !manually_edited && policy.auto_update {
            self.write_resource(resource, bundled_hash)?;
            tracing::info!(target = %target.display(), "Auto-updated resource to bundled version");
            return Ok(SyncOutcome::AutoUpdated);
        }

        if manually_edited && policy.force_update {
            let backup = backup::create_backup(&target, (self.clock)())?;
            self.write_resource(resource, bundled_hash)?;
            tracing::info!(
                target = %target.display(),
                backup = %backup.display(),
                "Force-updated manually edited resource"
            );
            return Ok(SyncOutcome::ForceUpdated { backup });
        }

        if manually_edited {
            tracing::warn!(
                target = %target.display(),
                "Resource was edited manually; keeping local changes (enable force-update to replace it)"
            );
            Ok(SyncOutcome::SkippedManualEdit)
        } else {
            tracing::warn!(
                target = %target.display(),
                "Resource is outdated but auto-update is disabled"
            );
            Ok(SyncOutcome::SkippedStale)
        }
    }

    /// Report the state of `resource` without writing anything.
    pub fn inspect(&self, resource: &ManagedResource) -> Result<ResourceReport> {
        let target = resource.target_path();
        let marker_path = resource.marker_path();
        let bundled_hash = resource.bundled_hash();

        let recorded_hash = VersionMarker::load(&marker_path)
            .map_err(Error::sync_failure)?
            .map(|m| m.content_hash().to_string());

        let current_hash = if fs::symlink_metadata(&target).is_ok() {
            Some(current_hash(&target)?)
        } else {
            None
        };

        let status = match current_hash.as_deref() {
            None => ResourceStatus::Absent,
            Some(current) if current == bundled_hash => ResourceStatus::InSync,
            Some(current) if recorded_hash.as_deref() == Some(current) => ResourceStatus::Stale,
            Some(_) => ResourceStatus::ManuallyEdited,
        };

        Ok(ResourceReport {
            status,
            backups: backup::list_backups(&target)?,
            target_path: target,
            marker_path,
            bundled_hash,
            current_hash,
            recorded_hash,
        })
    }

    /// Write bundled content, then the marker recording it.
    fn write_resource(&self, resource: &ManagedResource, bundled_hash: &str) -> Result<()> {
        io::write_atomic(
            &resource.target_path(),
            resource.bundled_content(),
            self.robustness,
        )
        .map_err(Error::sync_failure)?;
        self.write_marker(&resource.marker_path(), bundled_hash)
    }

    fn write_marker(&self, marker_path: &Path, hash: &str) -> Result<()> {
        VersionMarker::new(hash)?
            .store(marker_path, self.robustness)
            .map_err(Error::sync_failure)
    }
}

/// Hash of the target, which must be a regular file.
fn current_hash(target: &Path) -> Result<String> {
    if !target.is_file() {
        return Err(Error::sync_failure(devsvc_fs::Error::io(
            target,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "target exists but is not a regular file",
            ),
        )));
    }
    compute_file_hash(target).map_err(Error::sync_failure)
}

fn ensure_not_empty(target: &Path) -> Result<()> {
    let metadata = fs::metadata(target)
        .map_err(|e| Error::sync_failure(devsvc_fs::Error::io(target, e)))?;
    if metadata.len() == 0 {
        return Err(Error::EmptyResource {
            path: target.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use devsvc_fs::compute_content_hash;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const V1: &[u8] = b"services:\n  kafka:\n    image: redpanda:v1\n";
    const V2: &[u8] = b"services:\n  kafka:\n    image: redpanda:v2\n";

    fn resource(dir: &TempDir, content: &'static [u8]) -> ManagedResource {
        ManagedResource::new("compose-devservices.yml", dir.path().join(".devservices"), content)
            .unwrap()
    }

    #[test]
    fn stale_marker_is_refreshed_when_content_already_matches() {
        let temp = TempDir::new().unwrap();
        let res = resource(&temp, V1);
        fs::create_dir_all(res.target_dir()).unwrap();
        fs::write(res.target_path(), V1).unwrap();
        fs::write(res.marker_path(), VersionMarker::for_content(V2).render()).unwrap();

        let result = ResourceSyncManager::new()
            .sync(&res, &SyncPolicy::default())
            .unwrap();

        assert_eq!(result.outcome, SyncOutcome::UpToDate { marker_refreshed: true });
        assert_eq!(
            VersionMarker::load(&res.marker_path()).unwrap(),
            Some(VersionMarker::for_content(V1))
        );
    }

    #[test]
    fn missing_marker_blocks_auto_update() {
        let temp = TempDir::new().unwrap();
        let res = resource(&temp, V2);
        fs::create_dir_all(res.target_dir()).unwrap();
        fs::write(res.target_path(), V1).unwrap();

        let result = ResourceSyncManager::new()
            .sync(&res, &SyncPolicy::default())
            .unwrap();

        assert_eq!(result.outcome, SyncOutcome::SkippedManualEdit);
        assert_eq!(fs::read(res.target_path()).unwrap(), V1);
        assert!(!res.marker_path().exists());
    }

    #[test]
    fn auto_update_off_leaves_outdated_copy() {
        let temp = TempDir::new().unwrap();
        let manager = ResourceSyncManager::new();
        manager
            .sync(&resource(&temp, V1), &SyncPolicy::default())
            .unwrap();

        let policy = SyncPolicy {
            auto_update: false,
            ..SyncPolicy::default()
        };
        let res = resource(&temp, V2);
        let result = manager.sync(&res, &policy).unwrap();

        assert_eq!(result.outcome, SyncOutcome::SkippedStale);
        assert_eq!(fs::read(res.target_path()).unwrap(), V1);
    }

    #[test]
    fn directory_in_place_of_target_is_sync_failure() {
        let temp = TempDir::new().unwrap();
        let res = resource(&temp, V1);
        fs::create_dir_all(res.target_path()).unwrap();

        let err = ResourceSyncManager::new()
            .sync(&res, &SyncPolicy::default())
            .unwrap_err();

        assert!(matches!(err, Error::SyncFailure { ref path, .. } if *path == res.target_path()));
    }

    #[test]
    fn truncated_target_is_reported_as_empty() {
        let temp = TempDir::new().unwrap();
        let res = resource(&temp, V1);
        fs::create_dir_all(res.target_dir()).unwrap();
        fs::write(res.target_path(), b"").unwrap();

        let err = ResourceSyncManager::new()
            .sync(&res, &SyncPolicy::default())
            .unwrap_err();

        assert!(matches!(err, Error::EmptyResource { .. }));
    }

    #[test]
    fn inspect_reports_each_status() {
        let temp = TempDir::new().unwrap();
        let manager = ResourceSyncManager::new();
        let v1 = resource(&temp, V1);
        let v2 = resource(&temp, V2);

        assert_eq!(manager.inspect(&v1).unwrap().status, ResourceStatus::Absent);

        manager.sync(&v1, &SyncPolicy::default()).unwrap();
        assert_eq!(manager.inspect(&v1).unwrap().status, ResourceStatus::InSync);
        assert_eq!(manager.inspect(&v2).unwrap().status, ResourceStatus::Stale);

        fs::write(v1.target_path(), b"services: {}\n").unwrap();
        let report = manager.inspect(&v1).unwrap();
        assert_eq!(report.status, ResourceStatus::ManuallyEdited);
        assert_eq!(report.recorded_hash, Some(compute_content_hash(V1)));
        assert!(report.backups.is_empty());
    }
}
