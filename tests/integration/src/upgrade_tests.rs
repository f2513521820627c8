//! Upgrade scenarios across several releases of the bundled compose file
//!
//! Each "release" is a different bundled content synced into the same project
//! directory, the way successive versions of the application would.

use chrono::{DateTime, Local, TimeZone};
use devsvc_core::backup::list_backups;
use devsvc_core::{
    ManagedResource, ResourceStatus, ResourceSyncManager, SyncOutcome, SyncPolicy, VersionMarker,
};
use devsvc_fs::compute_content_hash;
use pretty_assertions::assert_eq;
use regex::Regex;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RELEASES: [&[u8]; 3] = [
    b"services:\n  kafka:\n    image: redpanda:v23.3\n",
    b"services:\n  kafka:\n    image: redpanda:v24.1\n",
    b"services:\n  kafka:\n    image: redpanda:v24.2\n",
];

fn release(dir: &Path, n: usize) -> ManagedResource {
    ManagedResource::new("compose-devservices.yml", dir, RELEASES[n]).unwrap()
}

fn clock() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).single().unwrap()
}

fn policy(auto_update: bool, force_update: bool) -> SyncPolicy {
    SyncPolicy {
        auto_update,
        force_update,
        ..SyncPolicy::default()
    }
}

#[test]
fn untouched_copy_follows_every_release() {
    let temp = TempDir::new().unwrap();
    let manager = ResourceSyncManager::new();

    let outcomes: Vec<SyncOutcome> = (0..RELEASES.len())
        .map(|n| {
            manager
                .sync(&release(temp.path(), n), &SyncPolicy::default())
                .unwrap()
                .outcome
        })
        .collect();

    assert_eq!(
        outcomes,
        vec![
            SyncOutcome::Extracted,
            SyncOutcome::AutoUpdated,
            SyncOutcome::AutoUpdated
        ]
    );
    let last = release(temp.path(), 2);
    assert_eq!(fs::read(last.target_path()).unwrap(), RELEASES[2]);
    assert_eq!(
        fs::read_to_string(last.marker_path()).unwrap(),
        format!("sha={}\n", compute_content_hash(RELEASES[2]))
    );
    assert!(list_backups(&last.target_path()).unwrap().is_empty());
}

#[test]
fn edited_copy_is_frozen_until_forced() {
    let temp = TempDir::new().unwrap();
    let manager = ResourceSyncManager::new().with_clock(clock);
    manager
        .sync(&release(temp.path(), 0), &SyncPolicy::default())
        .unwrap();

    let edited = b"services:\n  kafka:\n    image: redpanda:v23.3\n    mem_limit: 2g\n";
    fs::write(release(temp.path(), 0).target_path(), edited).unwrap();

    for n in 1..RELEASES.len() {
        let resource = release(temp.path(), n);
        let result = manager.sync(&resource, &policy(true, false)).unwrap();
        assert_eq!(result.outcome, SyncOutcome::SkippedManualEdit);
        assert_eq!(
            manager.inspect(&resource).unwrap().status,
            ResourceStatus::ManuallyEdited
        );
    }

    let latest = release(temp.path(), 2);
    let result = manager.sync(&latest, &policy(true, true)).unwrap();
    let SyncOutcome::ForceUpdated { backup } = result.outcome else {
        panic!("expected a forced update");
    };

    let pattern = Regex::new(r"\.backup\.\d{8}-\d{6}$").unwrap();
    assert!(pattern.is_match(&backup.to_string_lossy()));
    assert_eq!(fs::read(&backup).unwrap(), edited);
    assert_eq!(fs::read(latest.target_path()).unwrap(), RELEASES[2]);
    assert_eq!(list_backups(&latest.target_path()).unwrap(), vec![backup]);
}

#[test]
fn stale_copy_waits_for_auto_update() {
    let temp = TempDir::new().unwrap();
    let manager = ResourceSyncManager::new();
    manager
        .sync(&release(temp.path(), 0), &SyncPolicy::default())
        .unwrap();

    let next = release(temp.path(), 1);
    let held = manager.sync(&next, &policy(false, false)).unwrap();
    assert_eq!(held.outcome, SyncOutcome::SkippedStale);
    assert_eq!(manager.inspect(&next).unwrap().status, ResourceStatus::Stale);

    let updated = manager.sync(&next, &policy(true, false)).unwrap();
    assert_eq!(updated.outcome, SyncOutcome::AutoUpdated);
}

#[test]
fn lost_marker_counts_as_manual_edit() {
    let temp = TempDir::new().unwrap();
    let manager = ResourceSyncManager::new();
    let first = release(temp.path(), 0);
    manager.sync(&first, &SyncPolicy::default()).unwrap();
    fs::remove_file(first.marker_path()).unwrap();

    let result = manager
        .sync(&release(temp.path(), 1), &SyncPolicy::default())
        .unwrap();

    assert_eq!(result.outcome, SyncOutcome::SkippedManualEdit);
    assert_eq!(fs::read(first.target_path()).unwrap(), RELEASES[0]);
}

#[test]
fn garbled_marker_counts_as_manual_edit() {
    let temp = TempDir::new().unwrap();
    let manager = ResourceSyncManager::new();
    let first = release(temp.path(), 0);
    manager.sync(&first, &SyncPolicy::default()).unwrap();
    fs::write(first.marker_path(), "version=1.2.3\n").unwrap();

    let result = manager
        .sync(&release(temp.path(), 1), &SyncPolicy::default())
        .unwrap();

    assert_eq!(result.outcome, SyncOutcome::SkippedManualEdit);
    assert_eq!(VersionMarker::load(&first.marker_path()).unwrap(), None);
}

#[test]
fn binary_marker_counts_as_manual_edit() {
    let temp = TempDir::new().unwrap();
    let manager = ResourceSyncManager::new();
    let first = release(temp.path(), 0);
    manager.sync(&first, &SyncPolicy::default()).unwrap();
    fs::write(first.marker_path(), [0xff, 0xfe, 0x00, b'\n']).unwrap();

    let next = release(temp.path(), 1);
    let result = manager.sync(&next, &SyncPolicy::default()).unwrap();

    assert_eq!(result.outcome, SyncOutcome::SkippedManualEdit);
    assert_eq!(
        manager.inspect(&next).unwrap().status,
        ResourceStatus::ManuallyEdited
    );
    assert_eq!(fs::read(next.target_path()).unwrap(), RELEASES[0]);
}

#[test]
fn reverting_to_bundled_content_repairs_marker() {
    let temp = TempDir::new().unwrap();
    let manager = ResourceSyncManager::new();
    let first = release(temp.path(), 0);
    manager.sync(&first, &SyncPolicy::default()).unwrap();
    fs::remove_file(first.marker_path()).unwrap();

    let result = manager.sync(&first, &policy(false, false)).unwrap();

    assert_eq!(
        result.outcome,
        SyncOutcome::UpToDate {
            marker_refreshed: true
        }
    );
    assert_eq!(
        VersionMarker::load(&first.marker_path()).unwrap(),
        Some(VersionMarker::for_content(RELEASES[0]))
    );
}
