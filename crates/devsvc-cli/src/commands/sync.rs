//! Sync command implementation
//!
//! Runs the startup sequence: resolve configuration, synchronize the bundled
//! compose file, then publish the values other subsystems read.

use colored::Colorize;
use devsvc_core::{
    ConfigResolver, PublishedConfig, ResourceSyncManager, SyncOutcome, SyncPolicy, SyncResult,
};
use serde_json::json;

use super::{managed_resource, print_json};
use crate::error::Result;

/// Run the sync command
pub fn run_sync(
    resolver: &ConfigResolver,
    force: bool,
    no_auto_update: bool,
    json: bool,
) -> Result<()> {
    let (result, published) = sync_project(resolver, force, no_auto_update)?;

    if json {
        return print_json(&json!({
            "result": result,
            "published": published.to_json(),
        }));
    }

    let label = match &result.outcome {
        SyncOutcome::Extracted | SyncOutcome::AutoUpdated => result.outcome.to_string().green(),
        SyncOutcome::ForceUpdated { .. } => result.outcome.to_string().yellow(),
        SyncOutcome::UpToDate { .. } => result.outcome.to_string().cyan(),
        SyncOutcome::SkippedManualEdit | SyncOutcome::SkippedStale => {
            result.outcome.to_string().yellow()
        }
        SyncOutcome::SkippedDisabled => result.outcome.to_string().dimmed(),
    };
    println!("{} {}", "Compose file:".bold(), label);
    println!("  {:<10} {}", "Path:".dimmed(), result.target_path.display());

    match result.outcome {
        SyncOutcome::SkippedManualEdit => {
            println!();
            println!(
                "Local edits were kept. Run {} to replace them (a backup is taken first).",
                "devsvc sync --force".cyan()
            );
        }
        SyncOutcome::SkippedStale => {
            println!();
            println!(
                "A newer bundled version is available. Run {} to update.",
                "devsvc sync".cyan()
            );
        }
        _ => {}
    }

    if result.outcome != SyncOutcome::SkippedDisabled {
        println!();
        for (key, value) in published.entries() {
            println!("  {} = {}", key.dimmed(), value);
        }
    }
    Ok(())
}

/// Synchronize the compose file of the project `resolver` points at.
///
/// `force` and `no_auto_update` are applied on top of the resolved policy.
pub fn sync_project(
    resolver: &ConfigResolver,
    force: bool,
    no_auto_update: bool,
) -> Result<(SyncResult, PublishedConfig)> {
    let config = resolver.resolve()?;
    let policy = SyncPolicy {
        force_update: config.compose.force_update || force,
        auto_update: config.compose.auto_update && !no_auto_update,
        ..config.compose.clone()
    };

    let resource = managed_resource(&config)?;
    let result = ResourceSyncManager::new().sync(&resource, &policy)?;
    tracing::debug!(outcome = ?result.outcome, "Sync finished");

    let published = PublishedConfig::from_sync(&policy, &result);
    Ok((result, published))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{BUNDLED_COMPOSE, isolated_resolver};
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn target(root: &Path) -> PathBuf {
        root.join(".devservices").join("compose-devservices.yml")
    }

    #[test]
    fn first_sync_extracts_bundled_file() {
        let temp = TempDir::new().unwrap();

        let (result, published) =
            sync_project(&isolated_resolver(temp.path()), false, false).unwrap();

        assert_eq!(result.outcome, SyncOutcome::Extracted);
        assert_eq!(fs::read(target(temp.path())).unwrap(), BUNDLED_COMPOSE);
        assert_eq!(
            published.get("devservices.compose.force-update"),
            Some("false")
        );
    }

    #[test]
    fn force_flag_overrides_config() {
        let temp = TempDir::new().unwrap();
        let resolver = isolated_resolver(temp.path());
        sync_project(&resolver, false, false).unwrap();
        fs::write(target(temp.path()), "services: {}\n").unwrap();

        let (kept, _) = sync_project(&resolver, false, false).unwrap();
        assert_eq!(kept.outcome, SyncOutcome::SkippedManualEdit);

        let (forced, published) = sync_project(&resolver, true, false).unwrap();
        assert!(matches!(forced.outcome, SyncOutcome::ForceUpdated { .. }));
        assert_eq!(
            published.get("devservices.compose.force-update"),
            Some("true")
        );
        assert_eq!(fs::read(target(temp.path())).unwrap(), BUNDLED_COMPOSE);
    }

    #[test]
    fn disabled_in_project_config() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("devservices.toml"),
            "[compose]\nenabled = false\n",
        )
        .unwrap();

        let (result, _) = sync_project(&isolated_resolver(temp.path()), true, false).unwrap();

        assert_eq!(result.outcome, SyncOutcome::SkippedDisabled);
        assert!(!temp.path().join(".devservices").exists());
    }

    #[test]
    fn environment_comes_from_the_resolver() {
        let temp = TempDir::new().unwrap();
        let resolver = isolated_resolver(temp.path()).with_env(HashMap::from([(
            "DEVSVC_COMPOSE_ENABLED".to_string(),
            "false".to_string(),
        )]));

        let (result, _) = sync_project(&resolver, false, false).unwrap();

        assert_eq!(result.outcome, SyncOutcome::SkippedDisabled);
        assert!(!temp.path().join(".devservices").exists());
    }
}
