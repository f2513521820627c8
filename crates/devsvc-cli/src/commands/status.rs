//! Status command implementation

use colored::Colorize;
use devsvc_core::{ConfigResolver, ResourceReport, ResourceStatus, ResourceSyncManager};

use super::{managed_resource, print_json, short_hash};
use crate::error::Result;

/// Run the status command
pub fn run_status(resolver: &ConfigResolver, json: bool) -> Result<()> {
    let report = inspect_project(resolver)?;

    if json {
        return print_json(&report);
    }

    let status = match report.status {
        ResourceStatus::InSync => report.status.to_string().green(),
        ResourceStatus::Absent => report.status.to_string().red(),
        ResourceStatus::Stale | ResourceStatus::ManuallyEdited => {
            report.status.to_string().yellow()
        }
    };

    println!("{}", "Compose File Status".bold());
    println!();
    println!("  {:<10} {}", "Path:".dimmed(), report.target_path.display());
    println!("  {:<10} {}", "Status:".dimmed(), status);
    println!(
        "  {:<10} {}",
        "Bundled:".dimmed(),
        short_hash(&report.bundled_hash)
    );
    println!(
        "  {:<10} {}",
        "Current:".dimmed(),
        report.current_hash.as_deref().map(short_hash).unwrap_or("-")
    );
    println!(
        "  {:<10} {}",
        "Recorded:".dimmed(),
        report.recorded_hash.as_deref().map(short_hash).unwrap_or("-")
    );

    if !report.backups.is_empty() {
        println!();
        println!("{}:", "Backups".bold());
        for backup in &report.backups {
            println!("  {}", backup.display());
        }
    }

    let hint = match report.status {
        ResourceStatus::Absent | ResourceStatus::Stale => Some("devsvc sync"),
        ResourceStatus::ManuallyEdited => Some("devsvc sync --force"),
        ResourceStatus::InSync => None,
    };
    if let Some(hint) = hint {
        println!();
        println!("Run {} to bring it up to date.", hint.cyan());
    }
    Ok(())
}

/// Read-only report on the compose file of the project `resolver` points at.
pub fn inspect_project(resolver: &ConfigResolver) -> Result<ResourceReport> {
    let config = resolver.resolve()?;
    let resource = managed_resource(&config)?;
    Ok(ResourceSyncManager::new().inspect(&resource)?)
}
