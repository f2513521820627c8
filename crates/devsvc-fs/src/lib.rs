//! Filesystem primitives for the dev-services workspace
//!
//! Atomic writes, content hashing and TOML config loading. Nothing in
//! here knows about compose files or Kafka; those live in `devsvc-core`.

pub mod config;
pub mod error;
pub mod hash;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use hash::{compute_content_hash, compute_file_hash, is_content_hash};
pub use io::RobustnessConfig;
