//! Timestamped backups of managed resources
//!
//! Before a manually edited resource is force-updated, its current content is
//! copied next to it as `<name>.backup.<YYYYMMDD-HHMMSS>`. Backups are never
//! removed automatically.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use devsvc_fs::io;

use crate::{Error, Result};

/// Separator between the resource file name and the timestamp.
pub const BACKUP_INFIX: &str = ".backup.";

/// `strftime` pattern for the backup timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

const MAX_DISAMBIGUATORS: u32 = 1000;

/// Backup path for `target` at `now`, without collision handling.
pub fn backup_path(target: &Path, now: DateTime<Local>) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(BACKUP_INFIX);
    name.push(now.format(TIMESTAMP_FORMAT).to_string());
    PathBuf::from(name)
}

/// Copy `target` to a fresh backup file and return its path.
///
/// Two backups within the same second get a millisecond suffix, and a counter
/// after that, so an existing backup is never overwritten.
pub fn create_backup(target: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    let base = backup_path(target, now);
    let millis = now.timestamp_subsec_millis();

    let candidates = std::iter::once(base.clone())
        .chain(std::iter::once(with_suffix(&base, &format!("{millis:03}"))))
        .chain((1..MAX_DISAMBIGUATORS).map(|n| with_suffix(&base, &format!("{millis:03}-{n}"))));

    for candidate in candidates {
        if candidate.exists() {
            continue;
        }
        io::copy_new(target, &candidate).map_err(Error::sync_failure)?;
        tracing::info!(
            target = %target.display(),
            backup = %candidate.display(),
            "Backed up manually edited resource"
        );
        return Ok(candidate);
    }

    Err(Error::sync_failure(devsvc_fs::Error::io(
        base,
        std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "no free backup file name left for this second",
        ),
    )))
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push("-");
    name.push(suffix);
    PathBuf::from(name)
}

/// Existing backups of `target`, oldest first.
pub fn list_backups(target: &Path) -> Result<Vec<PathBuf>> {
    let (Some(dir), Some(file_name)) = (target.parent(), target.file_name()) else {
        return Ok(Vec::new());
    };
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let prefix = format!("{}{}", file_name.to_string_lossy(), BACKUP_INFIX);

    let mut backups = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(&prefix) && entry.path().is_file() {
            backups.push(entry.path());
        }
    }
    backups.sort();
    Ok(backups)
}
