//! Synchronization of managed resources
//!
//! - **sync**: materialize bundled content, honoring manual edits per policy
//! - **inspect**: report where a target stands without touching it

mod manager;
mod outcome;

pub use manager::ResourceSyncManager;
pub use outcome::{ResourceReport, ResourceStatus, SyncOutcome, SyncResult};
