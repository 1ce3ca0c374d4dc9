//! Database snapshots
//!
//! A snapshot is one JSON document holding the whole database inside a
//! versioned envelope with a content digest.

pub mod digest;
pub mod format;
pub mod persist;

pub use digest::content_digest;
pub use format::{SnapshotEnvelope, SNAPSHOT_FORMAT, SNAPSHOT_SCHEMA_VERSION};
pub use persist::{load_snapshot, save_snapshot, SnapshotInfo};
