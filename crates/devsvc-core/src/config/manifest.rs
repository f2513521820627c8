//! Manifest parsing for devservices.toml files
//!
//! A manifest is one configuration layer. Every field is optional so that a
//! layer only overrides what it actually sets; [`Manifest::merge`] applies
//! one layer on top of another.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::channels::{Direction, PayloadKind};

/// `[compose]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ComposeSection {
    pub enabled: Option<bool>,
    pub auto_update: Option<bool>,
    pub force_update: Option<bool>,
    pub target_directory: Option<PathBuf>,
    pub project_name: Option<String>,
}

/// `[kafka]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct KafkaSection {
    pub bootstrap_servers: Option<String>,
    pub schema_registry_url: Option<String>,
    pub provision_topics: Option<bool>,
    pub default_partitions: Option<u32>,
    pub default_replication: Option<u16>,
}

/// `[channels.<name>]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ChannelSection {
    pub direction: Option<Direction>,
    /// Defaults to the channel name
    pub topic: Option<String>,
    pub payload: Option<PayloadKind>,
    pub schema_subject: Option<String>,
    /// Extra connector properties; these win over derived ones
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// One configuration layer parsed from TOML
///
/// ```
/// use devsvc_core::config::Manifest;
///
/// let manifest = Manifest::parse(r#"
/// [compose]
/// force-update = true
///
/// [channels.orders-in]
/// direction = "incoming"
/// topic = "orders"
/// payload = "json"
/// "#).unwrap();
///
/// assert_eq!(manifest.compose.force_update, Some(true));
/// assert_eq!(manifest.channels["orders-in"].topic.as_deref(), Some("orders"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub compose: ComposeSection,

    #[serde(default)]
    pub kafka: KafkaSection,

    #[serde(default)]
    pub channels: BTreeMap<String, ChannelSection>,
}

impl Manifest {
    /// Parse a manifest from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `other` on top of this manifest.
    ///
    /// Scalars set in `other` win. Channels are merged by name, field by
    /// field, and their property maps are combined.
    pub fn merge(&mut self, other: &Manifest) {
        let c = &other.compose;
        override_with(&mut self.compose.enabled, &c.enabled);
        override_with(&mut self.compose.auto_update, &c.auto_update);
        override_with(&mut self.compose.force_update, &c.force_update);
        override_with(&mut self.compose.target_directory, &c.target_directory);
        override_with(&mut self.compose.project_name, &c.project_name);

        let k = &other.kafka;
        override_with(&mut self.kafka.bootstrap_servers, &k.bootstrap_servers);
        override_with(&mut self.kafka.schema_registry_url, &k.schema_registry_url);
        override_with(&mut self.kafka.provision_topics, &k.provision_topics);
        override_with(&mut self.kafka.default_partitions, &k.default_partitions);
        override_with(&mut self.kafka.default_replication, &k.default_replication);

        for (name, overlay) in &other.channels {
            let base = self.channels.entry(name.clone()).or_default();
            override_with(&mut base.direction, &overlay.direction);
            override_with(&mut base.topic, &overlay.topic);
            override_with(&mut base.payload, &overlay.payload);
            override_with(&mut base.schema_subject, &overlay.schema_subject);
            base.properties.extend(
                overlay
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
    }
}

fn override_with<T: Clone>(base: &mut Option<T>, overlay: &Option<T>) {
    if overlay.is_some() {
        base.clone_from(overlay);
    }
}
