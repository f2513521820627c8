use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{ChannelSection, KafkaSettings};
use crate::{Error, Result};

use super::payload::{Direction, PayloadKind};

/// Longest topic name a Kafka broker accepts.
pub const MAX_TOPIC_LEN: usize = 249;

/// Channel names become one segment of a dotted property key.
static CHANNEL_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid channel name regex"));

static TOPIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("Invalid topic regex"));

/// A fully resolved channel declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub name: String,
    pub direction: Direction,
    pub topic: String,
    pub payload: PayloadKind,
    pub schema_subject: Option<String>,
    pub properties: BTreeMap<String, String>,
}

impl ChannelSpec {
    /// A channel whose topic is its own name.
    pub fn new(name: impl Into<String>, direction: Direction, payload: PayloadKind) -> Self {
        let name = name.into();
        Self {
            topic: name.clone(),
            name,
            direction,
            payload,
            schema_subject: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    fn from_section(name: &str, section: &ChannelSection) -> Result<Self> {
        let direction = section
            .direction
            .ok_or_else(|| Error::channel(name, "missing 'direction' (incoming or outgoing)"))?;
        Ok(Self {
            name: name.to_string(),
            direction,
            topic: section.topic.clone().unwrap_or_else(|| name.to_string()),
            payload: section.payload.unwrap_or_default(),
            schema_subject: section.schema_subject.clone(),
            properties: section.properties.clone(),
        })
    }

    fn validate(&self) -> Result<()> {
        if !CHANNEL_NAME_PATTERN.is_match(&self.name) {
            return Err(Error::channel(
                &self.name,
                "name may only contain letters, digits, '_' and '-'",
            ));
        }
        if self.topic == "." || self.topic == ".." || !TOPIC_PATTERN.is_match(&self.topic) {
            return Err(Error::channel(
                &self.name,
                format!("'{}' is not a valid topic name", self.topic),
            ));
        }
        if self.topic.len() > MAX_TOPIC_LEN {
            return Err(Error::channel(
                &self.name,
                format!("topic name is longer than {MAX_TOPIC_LEN} characters"),
            ));
        }
        Ok(())
    }

    /// Prefix of every property belonging to this channel.
    pub fn property_prefix(&self) -> String {
        format!("messaging.{}.{}.", self.direction, self.name)
    }

    /// Connector properties for this channel, without the channel prefix.
    ///
    /// User-supplied properties override the derived ones.
    pub fn derived_properties(&self, kafka: &KafkaSettings) -> Result<BTreeMap<String, String>> {
        let mut props = BTreeMap::new();
        props.insert("connector".to_string(), "kafka".to_string());
        props.insert("topic".to_string(), self.topic.clone());
        props.insert(
            "bootstrap.servers".to_string(),
            kafka.bootstrap_servers.clone(),
        );

        let (key_side, value_side) = match self.direction {
            Direction::Incoming => ("key.deserializer", "value.deserializer"),
            Direction::Outgoing => ("key.serializer", "value.serializer"),
        };
        props.insert(
            key_side.to_string(),
            PayloadKind::String.codec_for(self.direction).to_string(),
        );
        props.insert(
            value_side.to_string(),
            self.payload.codec_for(self.direction).to_string(),
        );

        if self.payload.needs_schema_registry() {
            let url = kafka.schema_registry_url.as_deref().ok_or_else(|| {
                Error::channel(&self.name, "Avro payloads need kafka.schema-registry-url")
            })?;
            props.insert("schema.registry.url".to_string(), url.to_string());
            if let Some(subject) = &self.schema_subject {
                props.insert("schema.subject".to_string(), subject.clone());
            }
        }

        props.extend(
            self.properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Ok(props)
    }
}

/// Table of channels keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelRegistry {
    channels: BTreeMap<String, ChannelSpec>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from `[channels.*]` configuration sections.
    pub fn from_sections(sections: &BTreeMap<String, ChannelSection>) -> Result<Self> {
        let mut registry = Self::new();
        for (name, section) in sections {
            registry.register(ChannelSpec::from_section(name, section)?)?;
        }
        Ok(registry)
    }

    /// Add a channel. Names must be unique.
    pub fn register(&mut self, spec: ChannelSpec) -> Result<()> {
        spec.validate()?;
        if self.channels.contains_key(&spec.name) {
            return Err(Error::channel(&spec.name, "declared more than once"));
        }
        tracing::debug!(
            channel = %spec.name,
            direction = %spec.direction,
            topic = %spec.topic,
            "Registered channel"
        );
        self.channels.insert(spec.name.clone(), spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ChannelSpec> {
        self.channels.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelSpec> {
        self.channels.values()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Distinct topics across all channels, sorted.
    pub fn topics(&self) -> BTreeSet<&str> {
        self.channels.values().map(|c| c.topic.as_str()).collect()
    }

    /// Fully qualified connector properties for every channel.
    ///
    /// Ordered by channel name, then property key.
    pub fn properties(&self, kafka: &KafkaSettings) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for spec in self.channels.values() {
            let prefix = spec.property_prefix();
            for (key, value) in spec.derived_properties(kafka)? {
                out.push((format!("{prefix}{key}"), value));
            }
        }
        Ok(out)
    }
}
