//! Snapshot envelope schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_FORMAT: &str = "coexpr-snapshot";
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// On-disk snapshot document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    /// Always [`SNAPSHOT_FORMAT`]
    pub format: String,

    pub schema_version: u32,

    pub saved_at: DateTime<Utc>,

    /// SHA256 hex digest of `database`, see [`content_digest`](super::content_digest)
    pub content_digest: String,

    /// The serialized [`Database`](coexpr_core::Database)
    pub database: serde_json::Value,
}
