//! Human-readable YAML view of a database
//!
//! The dump is for people and diffs; it is never read back.

use std::path::Path;

use coexpr_core::{Database, GroupKind};
use serde::Serialize;

use crate::atomic::atomic_write;
use crate::errors::{serialization_error, Result};

#[derive(Debug, Serialize)]
struct DatabaseDump<'a> {
    gene_collections: Vec<CollectionDump<'a>>,
    genes: Vec<GeneDump<'a>>,
    ortholog_groups: Vec<GroupDump<'a>>,
    expression_matrices: Vec<MatrixDump<'a>>,
    clusterings: Vec<ClusteringDump<'a>>,
}

#[derive(Debug, Serialize)]
struct CollectionDump<'a> {
    name: &'a str,
    species: &'a str,
    gene_pattern: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    splice_variant_pattern: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct GeneDump<'a> {
    name: &'a str,
    collection: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ortholog_group: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    functional_annotation: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    splice_variants: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    highly_similar: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct GroupDump<'a> {
    name: &'a str,
    kind: GroupKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_ids: Vec<String>,
    genes: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct MatrixDump<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    collection: Option<&'a str>,
    rows: usize,
    samples: &'a [String],
}

#[derive(Debug, Serialize)]
struct ClusteringDump<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    collection: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expression_matrix: Option<&'a str>,
    clusters: Vec<ClusterDump<'a>>,
}

#[derive(Debug, Serialize)]
struct ClusterDump<'a> {
    name: &'a str,
    genes: Vec<&'a str>,
}

fn build(db: &Database) -> DatabaseDump<'_> {
    let gene_collections = db
        .collections()
        .map(|(_, c)| CollectionDump {
            name: &c.name,
            species: &c.species,
            gene_pattern: &c.gene_pattern,
            splice_variant_pattern: c.splice_variant_pattern.as_deref(),
        })
        .collect();

    let genes = db
        .genes()
        .map(|(_, gene)| {
            let canonical = db.variant(gene.variant);
            GeneDump {
                name: &gene.name,
                collection: &db.collection(gene.collection).name,
                ortholog_group: gene
                    .ortholog_group
                    .and_then(|g| db.ortholog_group(g).ok())
                    .map(|g| g.name.as_str()),
                functional_annotation: canonical.functional_annotation.as_deref(),
                splice_variants: gene
                    .splice_variants
                    .iter()
                    .map(|&v| db.variant(v).name.as_str())
                    .collect(),
                highly_similar: canonical.highly_similar.iter().map(String::as_str).collect(),
            }
        })
        .collect();

    let ortholog_groups = db
        .ortholog_groups()
        .map(|(_, group)| GroupDump {
            name: &group.name,
            kind: group.kind,
            external_ids: group.external_ids.iter().map(|f| f.to_string()).collect(),
            genes: group.genes.iter().map(|&g| db.gene_name(g)).collect(),
        })
        .collect();

    let expression_matrices = db
        .gene_expression_matrices()
        .map(|(_, m)| MatrixDump {
            name: &m.name,
            collection: m.collection.map(|c| db.collection(c).name.as_str()),
            rows: m.n_rows(),
            samples: m.samples(),
        })
        .collect();

    let clusterings = db
        .clusterings()
        .map(|(_, c)| ClusteringDump {
            name: &c.name,
            collection: c.collection.map(|id| db.collection(id).name.as_str()),
            expression_matrix: c
                .expression_matrix
                .map(|m| db.gene_expression_matrix_by_id(m).name.as_str()),
            clusters: c
                .clusters
                .iter()
                .map(|cluster| ClusterDump {
                    name: &cluster.name,
                    genes: cluster.genes.iter().map(|&g| db.gene_name(g)).collect(),
                })
                .collect(),
        })
        .collect();

    DatabaseDump {
        gene_collections,
        genes,
        ortholog_groups,
        expression_matrices,
        clusterings,
    }
}

/// Render the database as YAML
pub fn dump_to_string(db: &Database) -> Result<String> {
    serde_yaml::to_string(&build(db)).map_err(|e| serialization_error("dump", e))
}

/// Write the YAML dump to `path`
pub fn dump_yaml(db: &Database, path: &Path) -> Result<()> {
    let yaml = dump_to_string(db)?;
    atomic_write(path, yaml.as_bytes())?;
    tracing::debug!(path = %path.display(), size_bytes = yaml.len(), "Wrote database dump");
    Ok(())
}
