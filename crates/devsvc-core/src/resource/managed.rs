use std::borrow::Cow;
use std::path::{Path, PathBuf};

use devsvc_fs::compute_content_hash;

use crate::{Error, Result};

/// A bundled resource and the location it is materialized to.
#[derive(Debug, Clone)]
pub struct ManagedResource {
    name: String,
    target_dir: PathBuf,
    bundled: Cow<'static, [u8]>,
}

impl ManagedResource {
    /// Describe a resource named `name` living in `target_dir`.
    ///
    /// The name must be a single path component. Empty bundled content is
    /// accepted here and rejected by the sync step, so that the failure is
    /// reported against the target path.
    pub fn new(
        name: impl Into<String>,
        target_dir: impl Into<PathBuf>,
        bundled: impl Into<Cow<'static, [u8]>>,
    ) -> Result<Self> {
        let name = name.into();
        validate_file_name(&name)?;
        Ok(Self {
            name,
            target_dir: target_dir.into(),
            bundled: bundled.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// `<target_dir>/<name>`
    pub fn target_path(&self) -> PathBuf {
        self.target_dir.join(&self.name)
    }

    /// `<target_dir>/.<name>.version`
    pub fn marker_path(&self) -> PathBuf {
        self.target_dir.join(format!(".{}.version", self.name))
    }

    pub fn bundled_content(&self) -> &[u8] {
        &self.bundled
    }

    pub fn bundled_hash(&self) -> String {
        compute_content_hash(&self.bundled)
    }
}

fn validate_file_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::config("resource name must not be empty"));
    }
    if trimmed != name {
        return Err(Error::config(format!(
            "resource name '{name}' has surrounding whitespace"
        )));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::config(format!(
            "resource name '{name}' must be a plain file name"
        )));
    }
    Ok(())
}
