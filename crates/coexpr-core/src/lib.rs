//! coexpr core - canonical in-memory gene database
//!
//! This crate provides the foundational data structures and operations:
//! - Gene collections, genes and their (splice) variants
//! - Ortholog groups with add/merge semantics and singleton defaults
//! - Gene expression matrices and clusterings
//! - Database invariant checks
//! - A pure tab-delimited tokenizer used by the importers
//! - The error and logging facilities shared by the other crates

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;
pub mod tabular;

// Re-export commonly used types
pub use errors::{CoexprError, ExError, ExErrorKind, Result};
pub use model::{
    Cluster, Clustering, ClusteringId, CollectionId, FamilyId, Gene, GeneCollection,
    GeneExpressionMatrix, GeneId, GeneVariant, GroupId, GroupKind, MatrixId, OrthologGroup,
    VariantId, VariantKind,
};
pub use ops::Database;

#[doc(hidden)]
pub use coexpr_core_types as core_types;
