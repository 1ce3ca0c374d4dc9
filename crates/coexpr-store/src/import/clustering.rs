//! Clusterings: `gene<TAB>cluster`

use std::collections::BTreeMap;
use std::path::Path;

use coexpr_core::tabular::{parse_records, TabFormat};
use coexpr_core::{Cluster, Clustering, ClusteringId, CoexprError, Database};

use crate::errors::{import_validation, in_file, read_input, Result};

const OP: &str = "import_clustering";

/// Import a clustering and register it under `name`
///
/// `expression_matrix` names the matrix the clustering was derived from; it
/// must already be in the database.
///
/// ## Errors
///
/// - `ExErrorKind::Io`: the file cannot be read
/// - `ExErrorKind::InvalidInput`: genes of different collections, genes in
///   more than one cluster, or a matrix of another collection
/// - `ExErrorKind::NotFound`: the named matrix does not exist
/// - `ExErrorKind::AlreadyExists`: a clustering named `name` exists
pub fn import_clustering(
    db: &mut Database,
    name: &str,
    path: &Path,
    expression_matrix: Option<&str>,
) -> Result<ClusteringId> {
    let content = read_input(OP, path)?;
    let mut clustering = Clustering::new(name);
    let mut clusters: BTreeMap<String, Cluster> = BTreeMap::new();

    for record in parse_records(&content, TabFormat::TSV) {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %path.display(), "{}", e);
                continue;
            }
        };
        if record.len() < 2 {
            tracing::warn!(
                path = %path.display(),
                line = record.line,
                "Encountered line in clustering with {} < 2 columns",
                record.len()
            );
            continue;
        }

        let gene_name = record.field(0).unwrap_or_default();
        let Some(variant) = db.try_get_gene_variant(gene_name) else {
            tracing::warn!(
                path = %path.display(),
                line = record.line,
                gene = gene_name,
                "Gene of unknown collection, skipping row"
            );
            continue;
        };
        let gene = db.variant(variant).gene();
        let collection = db.gene(gene).collection;

        match clustering.collection {
            None => clustering.collection = Some(collection),
            Some(expected) if expected != collection => {
                return Err(in_file(OP, path)(CoexprError::MixedGeneCollections {
                    entity: format!("clustering {}", name),
                    expected: db.collection(expected).name.clone(),
                    gene: gene_name.to_string(),
                })
                .with_line(record.line));
            }
            Some(_) => {}
        }

        let cluster_name = record.field(1).unwrap_or_default();
        clusters
            .entry(cluster_name.to_string())
            .or_insert_with(|| Cluster::new(cluster_name))
            .add(gene);
    }
    clustering.clusters = clusters.into_values().collect();

    let mut members: Vec<&str> = clustering
        .clusters
        .iter()
        .flat_map(|c| c.genes.iter().map(|&g| db.gene_name(g)))
        .collect();
    members.sort_unstable();
    let mut repeated: Vec<String> = members
        .windows(2)
        .filter(|w| w[0] == w[1])
        .map(|w| w[0].to_string())
        .collect();
    repeated.dedup();
    if !repeated.is_empty() {
        return Err(in_file(OP, path)(CoexprError::MultiplyClusteredGenes {
            clustering: name.to_string(),
            genes: repeated,
        }));
    }

    if let Some(matrix_name) = expression_matrix {
        let matrix_id = db
            .gene_expression_matrix_id(matrix_name)
            .map_err(in_file(OP, path))?;
        let matrix_collection = db.gene_expression_matrix_by_id(matrix_id).collection;
        if let (Some(ours), Some(theirs)) = (clustering.collection, matrix_collection) {
            if ours != theirs {
                return Err(import_validation(
                    OP,
                    path,
                    format!(
                        "Clustering {} is of collection {} but expression matrix {} is of collection {}",
                        name,
                        db.collection(ours).name,
                        matrix_name,
                        db.collection(theirs).name
                    ),
                ));
            }
        }
        clustering.expression_matrix = Some(matrix_id);
    }

    tracing::debug!(
        path = %path.display(),
        clustering = name,
        clusters = clustering.clusters.len(),
        "Imported clustering"
    );

    db.add_clustering(clustering).map_err(in_file(OP, path))
}
