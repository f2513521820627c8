//! Core layer for the dev-services workspace
//!
//! This crate provides:
//!
//! - **Resource sync**: materialize a bundled compose file into a project
//!   directory, tracking a content-hash marker to detect manual edits
//! - **Backups**: timestamped copies taken before a forced overwrite
//! - **Configuration resolution**: layered merge of global, project, local and
//!   environment settings into one explicit [`ResolvedConfig`]
//! - **Published values**: the key/value pairs other subsystems read after sync
//! - **Channels**: declarative Kafka channel table and derived connector properties
//! - **Provisioning**: best-effort topic creation behind the [`TopicAdmin`] seam
//!
//! # Architecture
//!
//! ```text
//!              devsvc-cli
//!                  |
//!             devsvc-core
//!                  |
//!              devsvc-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use devsvc_core::{ManagedResource, ResourceSyncManager, SyncPolicy};
//!
//! # fn main() -> devsvc_core::Result<()> {
//! let policy = SyncPolicy::default();
//! let resource = ManagedResource::new(
//!     "compose-devservices.yml",
//!     "/work/project/.devservices",
//!     &b"services: {}\n"[..],
//! )?;
//! let result = ResourceSyncManager::new().sync(&resource, &policy)?;
//! println!("{}", result.outcome);
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod channels;
pub mod config;
pub mod error;
pub mod provision;
pub mod resource;
pub mod sync;

pub use channels::{ChannelRegistry, ChannelSpec, Direction, PayloadKind};
pub use config::{
    ConfigResolver, DEFAULT_PROJECT_NAME, KafkaSettings, Manifest, PublishedConfig,
    ResolvedConfig, SyncPolicy,
};
pub use error::{Error, Result};
pub use provision::{
    AdminError, ConfigurationWarning, InMemoryTopicAdmin, ProvisionReport, TopicAdmin, TopicPlan,
    plan_topics, provision_topics,
};
pub use resource::{ManagedResource, VersionMarker};
pub use sync::{ResourceReport, ResourceStatus, ResourceSyncManager, SyncOutcome, SyncResult};
