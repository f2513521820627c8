//! Effective settings after all layers are merged

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory, relative to the project root, that receives the compose file.
pub const DEFAULT_TARGET_DIRECTORY: &str = ".devservices";

/// File name of the bundled compose resource.
pub const DEFAULT_RESOURCE_NAME: &str = "compose-devservices.yml";

/// How the managed compose file is kept in step with the bundled one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SyncPolicy {
    pub enabled: bool,
    /// Replace outdated copies that were not edited by hand
    pub auto_update: bool,
    /// Replace hand-edited copies, after taking a backup
    pub force_update: bool,
    pub target_directory: PathBuf,
    /// Compose project name; not used for sync decisions
    pub project_name: Option<String>,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_update: true,
            force_update: false,
            target_directory: PathBuf::from(DEFAULT_TARGET_DIRECTORY),
            project_name: None,
        }
    }
}

/// Broker-side settings shared by every channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KafkaSettings {
    pub bootstrap_servers: String,
    pub schema_registry_url: Option<String>,
    /// Create missing topics before the application starts
    pub provision_topics: bool,
    pub default_partitions: u32,
    pub default_replication: u16,
}

impl Default for KafkaSettings {
    fn default() -> Self {
        Self {
            bootstrap_servers: "localhost:9092".to_string(),
            schema_registry_url: None,
            provision_topics: true,
            default_partitions: 1,
            default_replication: 1,
        }
    }
}
