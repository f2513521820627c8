//! Configuration resolution and published values
//!
//! Configuration is loaded and merged from these sources (later sources
//! override earlier):
//!
//! 1. **Global defaults** - `<config_dir>/devservices/config.toml`
//! 2. **Project config** - `devservices.toml` in the project root
//! 3. **Local overrides** - `devservices.local.toml` (git-ignored)
//! 4. **Environment** - `DEVSVC_COMPOSE_*` and `DEVSVC_KAFKA_*` variables
//!
//! The result is a [`ResolvedConfig`] value handed from the startup sequence
//! to whoever needs it. Nothing here is stored in globals.
//!
//! # Example
//!
//! ```no_run
//! use devsvc_core::config::ConfigResolver;
//!
//! # fn main() -> devsvc_core::Result<()> {
//! let config = ConfigResolver::new("/path/to/project").resolve()?;
//! println!("compose files go to {}", config.compose.target_directory.display());
//! # Ok(())
//! # }
//! ```

mod manifest;
mod policy;
mod published;
mod resolver;

pub use manifest::{ChannelSection, ComposeSection, KafkaSection, Manifest};
pub use policy::{DEFAULT_RESOURCE_NAME, DEFAULT_TARGET_DIRECTORY, KafkaSettings, SyncPolicy};
pub use published::{
    DEFAULT_PROJECT_NAME, PUBLISHED_PREFIX, PublishedConfig, resolve_project_name,
};
pub use resolver::{ConfigResolver, ENV_PREFIX, ResolvedConfig};
