//! SHA-256 content hashing
//!
//! Hashes are lower-case hex with no prefix and no separators. This is the
//! exact form stored in version markers, so it must stay stable.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Length of a hex-encoded SHA-256 digest.
pub const HASH_HEX_LEN: usize = 64;

/// Compute the SHA-256 hash of a byte slice as lower-case hex.
pub fn compute_content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-256 hash of a file's contents.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read.
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(compute_content_hash(&content))
}

/// Whether `value` looks like a hash produced by [`compute_content_hash`].
pub fn is_content_hash(value: &str) -> bool {
    value.len() == HASH_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
