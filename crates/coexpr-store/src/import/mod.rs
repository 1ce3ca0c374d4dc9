//! Flat-file importers
//!
//! Every importer reads the whole file, tokenizes it with
//! [`coexpr_core::tabular`] and applies its records to the database. Row
//! level problems are logged with `tracing::warn!` and the row is skipped;
//! structural problems abort the import with an [`ExError`] naming the file
//! and, where there is one, the line.
//!
//! [`ExError`]: coexpr_core::errors::ExError

pub mod annotation;
pub mod clustering;
pub mod expression_matrix;
pub mod gene_mapping;
pub mod orthologs;
pub mod update;

pub use annotation::import_functional_annotations;
pub use clustering::import_clustering;
pub use expression_matrix::import_expression_matrix;
pub use gene_mapping::import_gene_mappings;
pub use orthologs::{import_orthologs, OrthologImportSummary};
pub use update::{apply_update, load_update_description, UpdateDescription, UpdateSummary};

/// Counters shared by the simple line importers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records read
    pub records: usize,
    /// Records that changed the database
    pub applied: usize,
    /// Records or fields skipped with a warning
    pub skipped: usize,
}
