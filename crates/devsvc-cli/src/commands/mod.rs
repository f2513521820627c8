//! Command implementations for devsvc-cli

pub mod channels;
pub mod config;
pub mod status;
pub mod sync;
pub mod topics;

pub use channels::run_channels;
pub use config::run_config;
pub use status::run_status;
pub use sync::run_sync;
pub use topics::run_topics;

use std::path::Path;

use devsvc_core::{ConfigResolver, ManagedResource, ResolvedConfig};
use serde::Serialize;

use crate::error::Result;

/// Compose file shipped inside the binary.
pub const BUNDLED_COMPOSE: &[u8] = include_bytes!("../../assets/compose-devservices.yml");

/// Overrides the platform directory holding the global `config.toml`.
pub const CONFIG_DIR_ENV: &str = "DEVSVC_CONFIG_DIR";

/// Configuration resolver for the project at `root`, reading the process
/// environment.
pub(crate) fn resolver(root: &Path) -> ConfigResolver {
    let resolver = ConfigResolver::new(root);
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => resolver.with_global_config_dir(dir),
        None => resolver,
    }
}

/// A resolver that sees no environment variables and an empty global
/// config directory.
#[cfg(test)]
pub(crate) fn isolated_resolver(root: &Path) -> ConfigResolver {
    ConfigResolver::new(root)
        .with_global_config_dir(root.join(".global-config"))
        .with_env(std::collections::HashMap::new())
}

/// The bundled compose file, placed where `config` says.
pub(crate) fn managed_resource(config: &ResolvedConfig) -> Result<ManagedResource> {
    Ok(ManagedResource::new(
        config.resource_name.clone(),
        config.compose.target_directory.clone(),
        BUNDLED_COMPOSE,
    )?)
}

pub(crate) fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// First 12 characters of a content hash, for display.
pub(crate) fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_compose_is_not_empty() {
        assert!(!BUNDLED_COMPOSE.is_empty());
        let text = std::str::from_utf8(BUNDLED_COMPOSE).unwrap();
        assert!(text.contains("services:"));
    }

    #[test]
    fn isolated_resolver_reads_only_project_files() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("devservices.toml"),
            "[compose]\nauto-update = false\n",
        )
        .unwrap();

        let config = isolated_resolver(temp.path()).resolve().unwrap();

        assert!(config.compose.enabled);
        assert!(!config.compose.auto_update);
        assert_eq!(
            config.compose.target_directory,
            temp.path().join(".devservices")
        );
    }

    #[test]
    fn short_hash_truncates() {
        assert_eq!(short_hash("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_hash("abc"), "abc");
    }
}
