//! Values published after sync for other subsystems to read
//!
//! Once the compose file is in place, its location and the policy that put it
//! there are exposed as flat key/value pairs under [`PUBLISHED_PREFIX`]. The
//! pairs are computed once by the startup sequence and then only read.

use std::path::Path;

use serde_json::{Map, Value};

use super::policy::SyncPolicy;
use crate::sync::SyncResult;

/// Prefix of every published key.
pub const PUBLISHED_PREFIX: &str = "devservices.compose.";

/// Project name used when none is configured, or the configured one is blank.
pub const DEFAULT_PROJECT_NAME: &str = "devservices";

/// Ordered key/value pairs describing the managed compose file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedConfig {
    entries: Vec<(String, String)>,
}

impl PublishedConfig {
    /// Publish `policy` together with the resolved absolute `target_path`.
    pub fn new(policy: &SyncPolicy, target_path: &Path) -> Self {
        let mut published = Self {
            entries: Vec::with_capacity(5),
        };
        published.push("file", target_path.display().to_string());
        published.push("project-name", resolve_project_name(policy.project_name.as_deref()));
        published.push("enabled", policy.enabled.to_string());
        published.push("auto-update", policy.auto_update.to_string());
        published.push("force-update", policy.force_update.to_string());
        published
    }

    pub fn from_sync(policy: &SyncPolicy, result: &SyncResult) -> Self {
        Self::new(policy, &result.target_path)
    }

    fn push(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .push((format!("{PUBLISHED_PREFIX}{key}"), value.into()));
    }

    /// Look up a value by full key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `key=value` lines, one per entry.
    pub fn to_properties(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect()
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }
}

/// The configured project name, or [`DEFAULT_PROJECT_NAME`] when unset or blank.
pub fn resolve_project_name(configured: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_PROJECT_NAME)
        .to_string()
}
