use std::fmt;
use std::path::Path;
use std::str::FromStr;

use devsvc_fs::{RobustnessConfig, compute_content_hash, io, is_content_hash};

use crate::{Error, Result};

/// Key in front of the hash on the marker line.
pub const MARKER_PREFIX: &str = "sha=";

/// Hash of the content last written to a managed resource.
///
/// Stored on disk as a single line, `sha=<64 hex chars>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMarker {
    content_hash: String,
}

impl VersionMarker {
    /// Wrap an existing hash, which must be lower-case SHA-256 hex.
    pub fn new(content_hash: impl Into<String>) -> Result<Self> {
        let content_hash = content_hash.into();
        if !is_content_hash(&content_hash) {
            return Err(Error::InvalidMarker {
                reason: format!("'{content_hash}' is not a lower-case SHA-256 hex digest"),
            });
        }
        Ok(Self { content_hash })
    }

    pub fn for_content(bytes: &[u8]) -> Self {
        Self {
            content_hash: compute_content_hash(bytes),
        }
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// The marker file body, newline-terminated.
    pub fn render(&self) -> String {
        format!("{self}\n")
    }

    /// Read the marker at `path`.
    ///
    /// A missing or malformed file yields `None`; the caller then treats the
    /// resource as manually edited. Bytes that are not UTF-8 count as
    /// malformed.
    pub fn load(path: &Path) -> devsvc_fs::Result<Option<Self>> {
        let bytes = match io::read_bytes(path) {
            Ok(bytes) => bytes,
            Err(devsvc_fs::Error::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable version marker");
                return Ok(None);
            }
        };
        match content.parse() {
            Ok(marker) => Ok(Some(marker)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable version marker");
                Ok(None)
            }
        }
    }

    pub fn store(&self, path: &Path, robustness: RobustnessConfig) -> devsvc_fs::Result<()> {
        io::write_atomic(path, self.render().as_bytes(), robustness)
    }
}

impl FromStr for VersionMarker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        if line.lines().count() > 1 {
            return Err(Error::InvalidMarker {
                reason: "expected a single line".into(),
            });
        }
        let hash = line
            .strip_prefix(MARKER_PREFIX)
            .ok_or_else(|| Error::InvalidMarker {
                reason: format!("missing '{MARKER_PREFIX}' prefix"),
            })?;
        Self::new(hash.trim())
    }
}

impl fmt::Display for VersionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", MARKER_PREFIX, self.content_hash)
    }
}
