//! Snapshot persistence operations.
//!
//! Saving serializes the database, digests it and writes the envelope with
//! an atomic temp→rename. Loading verifies format, version and digest
//! before handing out a reindexed [`Database`].

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use coexpr_core::errors::ExError;
use coexpr_core::Database;

use super::digest::content_digest;
use super::format::{SnapshotEnvelope, SNAPSHOT_FORMAT, SNAPSHOT_SCHEMA_VERSION};
use crate::atomic::atomic_write;
use crate::errors::{io_error, persistence_error, serialization_error, Result};

/// What was written or read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub saved_at: DateTime<Utc>,
    pub content_digest: String,
}

/// Write `db` to `path`
///
/// ## Errors
///
/// - `ExErrorKind::Serialization`: the database could not be serialized
/// - `ExErrorKind::Io`: the file could not be written
pub fn save_snapshot(path: &Path, db: &Database) -> Result<SnapshotInfo> {
    let database =
        serde_json::to_value(db).map_err(|e| serialization_error("save_snapshot", e))?;
    let digest = content_digest(&database)?;

    let envelope = SnapshotEnvelope {
        format: SNAPSHOT_FORMAT.to_string(),
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        saved_at: Utc::now(),
        content_digest: digest,
        database,
    };
    let json =
        serde_json::to_vec(&envelope).map_err(|e| serialization_error("save_snapshot", e))?;

    atomic_write(path, &json)?;

    tracing::debug!(
        path = %path.display(),
        digest = %envelope.content_digest,
        size_bytes = json.len(),
        "Saved database snapshot"
    );

    Ok(SnapshotInfo {
        saved_at: envelope.saved_at,
        content_digest: envelope.content_digest,
    })
}

/// Read and verify the snapshot at `path`
///
/// ## Errors
///
/// - `ExErrorKind::Io`: the file could not be read
/// - `ExErrorKind::Serialization`: the file is not a snapshot document
/// - `ExErrorKind::Persistence`: wrong format, unsupported version or
///   digest mismatch
pub fn load_snapshot(path: &Path) -> Result<(Database, SnapshotInfo)> {
    let bytes = fs::read(path).map_err(|e| io_error("load_snapshot", path, e))?;
    let envelope: SnapshotEnvelope = serde_json::from_slice(&bytes).map_err(|e| {
        serialization_error("load_snapshot", e).with_path(path.display().to_string())
    })?;

    if envelope.format != SNAPSHOT_FORMAT {
        return Err(persistence_error(
            "load_snapshot",
            path,
            format!(
                "Not a database snapshot: format '{}', expected '{}'",
                envelope.format, SNAPSHOT_FORMAT
            ),
        ));
    }
    if envelope.schema_version != SNAPSHOT_SCHEMA_VERSION {
        return Err(persistence_error(
            "load_snapshot",
            path,
            format!(
                "Unsupported schema_version: {}. Expected {}",
                envelope.schema_version, SNAPSHOT_SCHEMA_VERSION
            ),
        ));
    }

    let digest = content_digest(&envelope.database)?;
    if digest != envelope.content_digest {
        return Err(persistence_error(
            "load_snapshot",
            path,
            format!(
                "Content digest mismatch: recorded {}, computed {}",
                envelope.content_digest, digest
            ),
        ));
    }

    let mut db: Database = serde_json::from_value(envelope.database).map_err(|e| {
        serialization_error("load_snapshot", e).with_path(path.display().to_string())
    })?;
    db.reindex()
        .map_err(|e| ExError::from(e).with_path(path.display().to_string()))?;

    tracing::debug!(
        path = %path.display(),
        digest = %digest,
        genes = db.gene_count(),
        "Loaded database snapshot"
    );

    Ok((
        db,
        SnapshotInfo {
            saved_at: envelope.saved_at,
            content_digest: digest,
        },
    ))
}
