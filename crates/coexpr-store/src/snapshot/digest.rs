//! Snapshot content digest
//!
//! The digest covers the canonical JSON text of the database value (object
//! keys sorted), so it can be recomputed from a loaded envelope without
//! deserializing into the model first.

use sha2::{Digest, Sha256};

use crate::errors::{serialization_error, Result};

/// SHA256 hex digest of a serialized database value
pub fn content_digest(database: &serde_json::Value) -> Result<String> {
    let canonical =
        serde_json::to_vec(database).map_err(|e| serialization_error("content_digest", e))?;

    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}
