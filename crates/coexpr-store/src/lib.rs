//! coexpr store - getting data into and out of the gene database
//!
//! Provides:
//! - Importers for every supported flat-file kind
//! - YAML update descriptions driving a batch of imports
//! - Versioned, digest-checked JSON snapshots written atomically
//! - Session lifecycle (create / open / save / close)
//! - A human-readable YAML dump

pub mod atomic;
pub mod dump;
pub mod errors;
pub mod import;
pub mod session;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use session::Session;
