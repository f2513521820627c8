//! End-to-end startup sequence
//!
//! Exercises the complete flow: config layers -> compose sync -> published
//! values -> channel wiring -> topic provisioning.

use devsvc_core::{
    ChannelRegistry, ConfigResolver, InMemoryTopicAdmin, ManagedResource, PublishedConfig,
    ResolvedConfig, ResourceStatus, ResourceSyncManager, SyncOutcome, provision_topics,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

const COMPOSE: &[u8] = b"services:\n  kafka:\n    image: redpanda:v24.2\n    ports: [\"9092:9092\"]\n";

/// A project with a devservices.toml and an isolated global config dir
struct TestProject {
    root: TempDir,
    global: TempDir,
}

impl TestProject {
    fn new(project_toml: &str) -> Self {
        let project = Self {
            root: TempDir::new().unwrap(),
            global: TempDir::new().unwrap(),
        };
        fs::write(project.root.path().join("devservices.toml"), project_toml).unwrap();
        project
    }

    fn resolve(&self, env: &[(&str, &str)]) -> ResolvedConfig {
        ConfigResolver::new(self.root.path())
            .with_global_config_dir(self.global.path())
            .with_env(
                env.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<HashMap<_, _>>(),
            )
            .resolve()
            .unwrap()
    }

    fn resource(&self, config: &ResolvedConfig) -> ManagedResource {
        ManagedResource::new(
            config.resource_name.clone(),
            config.compose.target_directory.clone(),
            COMPOSE,
        )
        .unwrap()
    }
}

#[test]
fn full_startup_sequence() {
    let project = TestProject::new(
        r#"
[compose]
project-name = "shop"

[kafka]
schema-registry-url = "http://localhost:8081"
default-partitions = 2

[channels.orders-in]
direction = "incoming"
topic = "orders"
payload = "json"

[channels.orders-out]
direction = "outgoing"
topic = "orders"
payload = "json"

[channels.quotes]
direction = "outgoing"
payload = "avro"
"#,
    );
    let config = project.resolve(&[]);
    let resource = project.resource(&config);

    let result = ResourceSyncManager::new()
        .sync(&resource, &config.compose)
        .unwrap();
    assert_eq!(result.outcome, SyncOutcome::Extracted);

    let published = PublishedConfig::from_sync(&config.compose, &result);
    let compose_file = published.get("devservices.compose.file").unwrap();
    assert_eq!(fs::read(compose_file).unwrap(), COMPOSE);
    assert_eq!(
        published.get("devservices.compose.project-name"),
        Some("shop")
    );

    let registry = ChannelRegistry::from_sections(&config.channels).unwrap();
    let properties: HashMap<String, String> = registry
        .properties(&config.kafka)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(
        properties["messaging.outgoing.quotes.schema.registry.url"],
        "http://localhost:8081"
    );
    assert_eq!(
        properties["messaging.incoming.orders-in.bootstrap.servers"],
        "localhost:9092"
    );

    let admin = InMemoryTopicAdmin::with_topics(["quotes"]);
    let report = provision_topics(&admin, &registry, &config.kafka);
    assert_eq!(report.created, vec!["orders"]);
    assert_eq!(report.existing, vec!["quotes"]);
    assert_eq!(admin.topic_settings("orders"), Some((2, 1)));
}

#[test]
fn environment_redirects_target_directory() {
    let project = TestProject::new("");
    let elsewhere = TempDir::new().unwrap();
    let dir = elsewhere.path().join("compose");
    let dir_str = dir.display().to_string();

    let config = project.resolve(&[("DEVSVC_COMPOSE_TARGET_DIR", dir_str.as_str())]);
    let resource = project.resource(&config);
    ResourceSyncManager::new()
        .sync(&resource, &config.compose)
        .unwrap();

    assert!(dir.join("compose-devservices.yml").is_file());
    assert!(!project.root.path().join(".devservices").exists());
}

#[test]
fn local_file_disables_sync_for_one_developer() {
    let project = TestProject::new("[compose]\nforce-update = true\n");
    fs::write(
        project.root.path().join("devservices.local.toml"),
        "[compose]\nenabled = false\n",
    )
    .unwrap();

    let config = project.resolve(&[]);
    let resource = project.resource(&config);
    let result = ResourceSyncManager::new()
        .sync(&resource, &config.compose)
        .unwrap();

    assert_eq!(result.outcome, SyncOutcome::SkippedDisabled);
    assert_eq!(
        ResourceSyncManager::new().inspect(&resource).unwrap().status,
        ResourceStatus::Absent
    );
}

#[test]
fn sync_result_serializes_for_tooling() {
    let project = TestProject::new("");
    let config = project.resolve(&[]);
    let resource = project.resource(&config);

    let result = ResourceSyncManager::new()
        .sync(&resource, &config.compose)
        .unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["outcome"]["outcome"], "extracted");
    assert_eq!(value["bundled_hash"].as_str().unwrap().len(), 64);
    assert!(value["previous_hash"].is_null());
}
