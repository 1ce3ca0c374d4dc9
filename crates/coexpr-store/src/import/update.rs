//! YAML update descriptions
//!
//! An update description lists everything to add to a database in one go:
//!
//! ```yaml
//! gene_collections:
//!   - name: arabidopsis
//!     species: Arabidopsis thaliana
//!     gene_pattern: 'AT[1-5CM]G\d{5}'
//!     splice_variant_pattern: '(AT[1-5CM]G\d{5})\.\d+'
//! gene_mappings: [mapping.tsv]
//! functional_annotations: [annotation.tsv]
//! orthologs:
//!   - { source: plaza, path: orthologs.tsv }
//! expression_matrices:
//!   - { name: leaf, path: leaf.tsv }
//! clusterings:
//!   - { name: leaf_k10, path: clusters.tsv, expression_matrix: leaf }
//! ```
//!
//! Relative paths are resolved against the directory of the YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use coexpr_core::{Database, GeneCollection};
use serde::{Deserialize, Serialize};

use super::{
    import_clustering, import_expression_matrix, import_functional_annotations,
    import_gene_mappings, import_orthologs,
};
use crate::errors::{import_validation, io_error, Result};

const OP: &str = "apply_update";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDescription {
    #[serde(default)]
    pub gene_collections: Vec<CollectionSpec>,
    #[serde(default)]
    pub gene_mappings: Vec<PathBuf>,
    #[serde(default)]
    pub functional_annotations: Vec<PathBuf>,
    #[serde(default)]
    pub orthologs: Vec<OrthologFile>,
    #[serde(default)]
    pub expression_matrices: Vec<MatrixFile>,
    #[serde(default)]
    pub clusterings: Vec<ClusteringFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionSpec {
    pub name: String,
    #[serde(default)]
    pub species: String,
    pub gene_pattern: String,
    #[serde(default)]
    pub splice_variant_pattern: Option<String>,
}

/// An ortholog table and the source its family ids belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrthologFile {
    pub source: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatrixFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusteringFile {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub expression_matrix: Option<String>,
}

/// What an update added
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub gene_collections: usize,
    pub gene_mappings: usize,
    pub functional_annotations: usize,
    pub ortholog_files: usize,
    pub expression_matrices: usize,
    pub clusterings: usize,
    pub singleton_groups: usize,
}

/// Read an update description and resolve its paths
///
/// ## Errors
///
/// - `ExErrorKind::Io`: the file cannot be read
/// - `ExErrorKind::InvalidInput`: the YAML does not describe an update
pub fn load_update_description(path: &Path) -> Result<UpdateDescription> {
    let content = fs::read_to_string(path).map_err(|e| io_error("load_update", path, e))?;
    let mut description: UpdateDescription = serde_yaml::from_str(&content).map_err(|e| {
        import_validation("load_update", path, format!("YAML parse error: {}", e))
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    description.resolve_paths(base);
    Ok(description)
}

impl UpdateDescription {
    /// Make every relative path relative to `base` instead
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.gene_mappings.iter_mut().for_each(resolve);
        self.functional_annotations.iter_mut().for_each(resolve);
        self.orthologs.iter_mut().for_each(|o| resolve(&mut o.path));
        self.expression_matrices
            .iter_mut()
            .for_each(|m| resolve(&mut m.path));
        self.clusterings.iter_mut().for_each(|c| resolve(&mut c.path));
    }
}

/// Apply an update to `db`
///
/// Imports run in the order collections, gene mappings, functional
/// annotations, orthologs, expression matrices, clusterings; afterwards
/// every gene still without an ortholog group gets a singleton group.
///
/// A collection that already exists with identical patterns is left alone.
///
/// ## Errors
///
/// The first error of any import. The database may hold part of the
/// update at that point; callers must not persist it.
pub fn apply_update(db: &mut Database, update: &UpdateDescription) -> Result<UpdateSummary> {
    let mut summary = UpdateSummary::default();

    for spec in &update.gene_collections {
        let collection = GeneCollection::new(
            spec.name.clone(),
            spec.species.clone(),
            spec.gene_pattern.clone(),
            spec.splice_variant_pattern.clone(),
        )?;
        let existing = db
            .collections()
            .find(|(_, c)| c.name == collection.name)
            .map(|(_, c)| c == &collection);
        match existing {
            Some(true) => {
                tracing::debug!(collection = %spec.name, "Gene collection already present");
            }
            _ => {
                db.add_gene_collection(collection)
                    .map_err(|e| coexpr_core::ExError::from(e).with_op(OP))?;
                summary.gene_collections += 1;
            }
        }
    }

    for path in &update.gene_mappings {
        import_gene_mappings(db, path)?;
        summary.gene_mappings += 1;
    }
    for path in &update.functional_annotations {
        import_functional_annotations(db, path)?;
        summary.functional_annotations += 1;
    }
    for file in &update.orthologs {
        import_orthologs(db, &file.path, &file.source)?;
        summary.ortholog_files += 1;
    }
    for file in &update.expression_matrices {
        import_expression_matrix(db, &file.name, &file.path)?;
        summary.expression_matrices += 1;
    }
    for file in &update.clusterings {
        import_clustering(
            db,
            &file.name,
            &file.path,
            file.expression_matrix.as_deref(),
        )?;
        summary.clusterings += 1;
    }

    summary.singleton_groups = db.assign_singleton_groups()?;

    tracing::debug!(
        collections = summary.gene_collections,
        matrices = summary.expression_matrices,
        singletons = summary.singleton_groups,
        "Applied update"
    );
    Ok(summary)
}
