//! Run correlation types
//!
//! Every import or analysis run gets a [`RunId`] so that the log lines of one
//! invocation can be told apart when several runs share a log sink.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single import or analysis run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new RunId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
    /// Name of the top-level command, e.g. `database_add` or `coexpr`
    pub command: String,
}

impl RunContext {
    /// Create a new context with a fresh RunId
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            run_id: RunId::new(),
            command: command.into(),
        }
    }

    /// Create a context with an existing RunId
    pub fn with_run_id(run_id: RunId, command: impl Into<String>) -> Self {
        Self {
            run_id,
            command: command.into(),
        }
    }
}
