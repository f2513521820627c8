//! Error types for devsvc-core

use std::path::PathBuf;

/// Result type for devsvc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in devsvc-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filesystem operation failed while synchronizing a managed resource
    #[error("Sync failed at {path}: {source}")]
    SyncFailure {
        path: PathBuf,
        #[source]
        source: devsvc_fs::Error,
    },

    /// The managed resource is, or would end up, empty
    #[error("Managed resource at {path} is empty; refusing to continue with an empty artifact")]
    EmptyResource { path: PathBuf },

    /// A version marker could not be parsed
    #[error("Invalid version marker: {reason}")]
    InvalidMarker { reason: String },

    /// Configuration is present but unusable
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// A channel definition is incomplete or inconsistent
    #[error("Invalid channel '{channel}': {reason}")]
    InvalidChannel { channel: String, reason: String },

    // Transparent wrappers for underlying errors
    /// Filesystem error from devsvc-fs
    #[error(transparent)]
    Fs(#[from] devsvc_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    /// Wrap a filesystem error raised during sync, keeping its path.
    pub(crate) fn sync_failure(source: devsvc_fs::Error) -> Self {
        let path = source.path().map(PathBuf::from).unwrap_or_default();
        Self::SyncFailure { path, source }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn channel(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidChannel {
            channel: channel.into(),
            reason: reason.into(),
        }
    }
}
