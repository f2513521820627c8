//! Best-effort topic provisioning
//!
//! Before the application starts, topics used by declared channels can be
//! created on the dev broker. Nothing here is allowed to abort startup: every
//! admin failure becomes a [`ConfigurationWarning`] that is logged and
//! collected in the [`ProvisionReport`].

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::channels::ChannelRegistry;
use crate::config::KafkaSettings;

/// Failure reported by a [`TopicAdmin`] implementation
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AdminError {
    message: String,
}

impl AdminError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The slice of broker administration provisioning needs.
pub trait TopicAdmin {
    fn topic_exists(&self, topic: &str) -> Result<bool, AdminError>;

    fn create_topic(&self, topic: &str, partitions: u32, replication: u16)
    -> Result<(), AdminError>;
}

/// A topic that provisioning would create if missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPlan {
    pub topic: String,
    pub partitions: u32,
    pub replication: u16,
    /// Channels using the topic
    pub channels: Vec<String>,
}

/// Non-fatal problem hit while provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationWarning {
    pub topic: String,
    pub message: String,
}

/// Report from a provisioning run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionReport {
    /// Provisioning is turned off in configuration
    pub skipped: bool,
    pub created: Vec<String>,
    pub existing: Vec<String>,
    pub warnings: Vec<ConfigurationWarning>,
}

/// One plan entry per distinct topic, sorted by topic name.
pub fn plan_topics(registry: &ChannelRegistry, kafka: &KafkaSettings) -> Vec<TopicPlan> {
    let mut by_topic: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for spec in registry.iter() {
        by_topic
            .entry(spec.topic.as_str())
            .or_default()
            .push(spec.name.clone());
    }
    by_topic
        .into_iter()
        .map(|(topic, channels)| TopicPlan {
            topic: topic.to_string(),
            partitions: kafka.default_partitions,
            replication: kafka.default_replication,
            channels,
        })
        .collect()
}

/// Create every planned topic that does not exist yet.
///
/// Never fails; see [`ProvisionReport::warnings`].
pub fn provision_topics(
    admin: &dyn TopicAdmin,
    registry: &ChannelRegistry,
    kafka: &KafkaSettings,
) -> ProvisionReport {
    if !kafka.provision_topics {
        tracing::debug!("Topic provisioning disabled");
        return ProvisionReport {
            skipped: true,
            ..ProvisionReport::default()
        };
    }

    let mut report = ProvisionReport::default();
    for plan in plan_topics(registry, kafka) {
        let result = admin.topic_exists(&plan.topic).and_then(|exists| {
            if exists {
                Ok(false)
            } else {
                admin
                    .create_topic(&plan.topic, plan.partitions, plan.replication)
                    .map(|()| true)
            }
        });

        match result {
            Ok(true) => {
                tracing::info!(topic = %plan.topic, partitions = plan.partitions, "Created topic");
                report.created.push(plan.topic);
            }
            Ok(false) => report.existing.push(plan.topic),
            Err(e) => {
                tracing::warn!(topic = %plan.topic, error = %e, "Could not provision topic, continuing");
                report.warnings.push(ConfigurationWarning {
                    topic: plan.topic,
                    message: e.to_string(),
                });
            }
        }
    }
    report
}

/// Topic admin backed by an in-process set of topics.
///
/// Stands in for a broker in tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryTopicAdmin {
    topics: RefCell<BTreeMap<String, (u32, u16)>>,
}

impl InMemoryTopicAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let admin = Self::new();
        admin
            .topics
            .borrow_mut()
            .extend(topics.into_iter().map(|t| (t.into(), (1, 1))));
        admin
    }

    pub fn topic_names(&self) -> Vec<String> {
        self.topics.borrow().keys().cloned().collect()
    }

    /// Partition and replication settings of `topic`, if it exists.
    pub fn topic_settings(&self, topic: &str) -> Option<(u32, u16)> {
        self.topics.borrow().get(topic).copied()
    }
}

impl TopicAdmin for InMemoryTopicAdmin {
    fn topic_exists(&self, topic: &str) -> Result<bool, AdminError> {
        Ok(self.topics.borrow().contains_key(topic))
    }

    fn create_topic(
        &self,
        topic: &str,
        partitions: u32,
        replication: u16,
    ) -> Result<(), AdminError> {
        let mut topics = self.topics.borrow_mut();
        if topics.contains_key(topic) {
            return Err(AdminError::new(format!("topic '{topic}' already exists")));
        }
        topics.insert(topic.to_string(), (partitions, replication));
        Ok(())
    }
}
