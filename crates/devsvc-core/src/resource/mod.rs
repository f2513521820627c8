//! Managed resources and their version markers
//!
//! A managed resource is a bundled file whose canonical content ships with the
//! binary but whose local copy may be edited. Next to every copy lives a
//! marker recording the hash of the content that was last written there.

mod managed;
mod marker;

pub use managed::ManagedResource;
pub use marker::{MARKER_PREFIX, VersionMarker};
