//! Configuration resolution with layered merge

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use devsvc_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

use super::manifest::{ChannelSection, Manifest};
use super::policy::{DEFAULT_RESOURCE_NAME, KafkaSettings, SyncPolicy};

/// Prefix shared by all environment overrides.
pub const ENV_PREFIX: &str = "DEVSVC_";

const PROJECT_FILE: &str = "devservices.toml";
const LOCAL_FILE: &str = "devservices.local.toml";

/// The effective configuration after merging all sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Sync policy; `target_directory` is absolute after resolution
    pub compose: SyncPolicy,
    /// File name of the managed compose resource
    pub resource_name: String,
    pub kafka: KafkaSettings,
    pub channels: BTreeMap<String, ChannelSection>,
}

/// Resolves configuration by merging multiple sources
///
/// Missing files are skipped. Invalid TOML, or an environment override that
/// cannot be parsed, is an error.
pub struct ConfigResolver {
    /// Project root directory
    root: PathBuf,

    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,

    /// Fixed environment (used for testing). When `None`, the process
    /// environment is read.
    env_override: Option<HashMap<String, String>>,
}

impl ConfigResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global_config_dir_override: None,
            env_override: None,
        }
    }

    /// Use `dir` instead of the platform config directory.
    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir_override = Some(dir.into());
        self
    }

    /// Read overrides from `env` instead of the process environment.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env_override = Some(env);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_config_path(&self) -> PathBuf {
        self.root.join(PROJECT_FILE)
    }

    pub fn local_config_path(&self) -> PathBuf {
        self.root.join(LOCAL_FILE)
    }

    fn global_config_path(&self) -> Option<PathBuf> {
        let dir = match &self.global_config_dir_override {
            Some(dir) => dir.clone(),
            None => dirs::config_dir()?.join("devservices"),
        };
        Some(dir.join("config.toml"))
    }

    fn env_var(&self, key: &str) -> Option<String> {
        match &self.env_override {
            Some(env) => env.get(key).cloned(),
            None => std::env::var(key).ok(),
        }
    }

    /// Resolve the configuration by merging all sources
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let mut manifest = Manifest::default();

        let layers = [
            ("global", self.global_config_path()),
            ("project", Some(self.project_config_path())),
            ("local", Some(self.local_config_path())),
        ];
        let store = ConfigStore::new();
        for (layer, path) in layers {
            let Some(path) = path else { continue };
            match store.load_optional::<Manifest>(&path)? {
                Some(parsed) => {
                    tracing::debug!(layer, path = %path.display(), "Loaded config layer");
                    manifest.merge(&parsed);
                }
                None => {
                    tracing::debug!(layer, path = %path.display(), "No config layer found, skipping");
                }
            }
        }

        manifest.merge(&self.env_layer()?);

        Ok(self.finish(manifest))
    }

    fn env_layer(&self) -> Result<Manifest> {
        let mut layer = Manifest::default();
        let compose = &mut layer.compose;
        compose.enabled = self.env_bool("COMPOSE_ENABLED")?;
        compose.auto_update = self.env_bool("COMPOSE_AUTO_UPDATE")?;
        compose.force_update = self.env_bool("COMPOSE_FORCE_UPDATE")?;
        compose.target_directory = self
            .env_string("COMPOSE_TARGET_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);
        compose.project_name = self.env_string("COMPOSE_PROJECT_NAME");
        layer.kafka.bootstrap_servers = self.env_string("KAFKA_BOOTSTRAP_SERVERS");
        layer.kafka.schema_registry_url = self.env_string("KAFKA_SCHEMA_REGISTRY_URL");
        Ok(layer)
    }

    fn env_string(&self, suffix: &str) -> Option<String> {
        self.env_var(&format!("{ENV_PREFIX}{suffix}"))
    }

    fn env_bool(&self, suffix: &str) -> Result<Option<bool>> {
        let key = format!("{ENV_PREFIX}{suffix}");
        match self.env_var(&key) {
            None => Ok(None),
            Some(raw) => parse_bool(&raw)
                .map(Some)
                .ok_or_else(|| Error::config(format!("{key}: expected a boolean, got '{raw}'"))),
        }
    }

    fn finish(&self, manifest: Manifest) -> ResolvedConfig {
        let defaults = SyncPolicy::default();
        let c = manifest.compose;
        let target_directory = c
            .target_directory
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(defaults.target_directory);
        let target_directory = if target_directory.is_absolute() {
            target_directory
        } else {
            self.root.join(target_directory)
        };

        let kafka_defaults = KafkaSettings::default();
        let k = manifest.kafka;

        ResolvedConfig {
            compose: SyncPolicy {
                enabled: c.enabled.unwrap_or(defaults.enabled),
                auto_update: c.auto_update.unwrap_or(defaults.auto_update),
                force_update: c.force_update.unwrap_or(defaults.force_update),
                target_directory,
                project_name: c.project_name,
            },
            resource_name: DEFAULT_RESOURCE_NAME.to_string(),
            kafka: KafkaSettings {
                bootstrap_servers: k
                    .bootstrap_servers
                    .unwrap_or(kafka_defaults.bootstrap_servers),
                schema_registry_url: k.schema_registry_url,
                provision_topics: k.provision_topics.unwrap_or(kafka_defaults.provision_topics),
                default_partitions: k
                    .default_partitions
                    .unwrap_or(kafka_defaults.default_partitions),
                default_replication: k
                    .default_replication
                    .unwrap_or(kafka_defaults.default_replication),
            },
            channels: manifest.channels,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
