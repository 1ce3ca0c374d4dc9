use std::collections::{BTreeMap, HashSet};

use crate::model::GeneId;
use crate::ops::Database;

/// Find genes that belong to no ortholog group
///
/// Returns gene names.
pub fn find_genes_without_group(db: &Database) -> Vec<String> {
    db.genes()
        .filter(|(_, g)| g.ortholog_group.is_none())
        .map(|(_, g)| g.name.clone())
        .collect()
}

/// Find genes whose group reference points to a removed group or to a
/// group that does not list them
///
/// Returns (gene, group) tuples.
pub fn find_stale_group_refs(db: &Database) -> Vec<(String, String)> {
    let mut stale = Vec::new();
    for (id, gene) in db.genes() {
        if let Some(group_id) = gene.ortholog_group {
            match db.ortholog_group(group_id) {
                Ok(group) if group.contains(id) => {}
                Ok(group) => stale.push((gene.name.clone(), group.name.clone())),
                Err(_) => stale.push((gene.name.clone(), group_id.to_string())),
            }
        }
    }
    stale
}

/// Find group members whose back-reference names another group
///
/// Returns (group, gene) tuples.
pub fn find_members_with_wrong_backref(db: &Database) -> Vec<(String, String)> {
    let mut wrong = Vec::new();
    for (group_id, group) in db.ortholog_groups() {
        for &gene in &group.genes {
            if db.gene(gene).ortholog_group != Some(group_id) {
                wrong.push((group.name.clone(), db.gene_name(gene).to_string()));
            }
        }
    }
    wrong
}

/// Find genes listed as members of more than one group
pub fn find_genes_in_multiple_groups(db: &Database) -> Vec<String> {
    let mut counts: BTreeMap<GeneId, usize> = BTreeMap::new();
    for (_, group) in db.ortholog_groups() {
        for &gene in &group.genes {
            *counts.entry(gene).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|&(_, n)| n > 1)
        .map(|(gene, _)| db.gene_name(gene).to_string())
        .collect()
}

/// Find groups without members
pub fn find_empty_groups(db: &Database) -> Vec<String> {
    db.ortholog_groups()
        .filter(|(_, g)| g.is_empty())
        .map(|(_, g)| g.name.clone())
        .collect()
}

/// Find singleton groups that hold more than one gene or a family id
pub fn find_malformed_singletons(db: &Database) -> Vec<String> {
    db.ortholog_groups()
        .filter(|(_, g)| g.is_singleton() && (g.len() != 1 || !g.external_ids.is_empty()))
        .map(|(_, g)| g.name.clone())
        .collect()
}

/// Find genes placed in more than one cluster of the same clustering
///
/// Returns (clustering, gene) tuples.
pub fn find_multiply_clustered_genes(db: &Database) -> Vec<(String, String)> {
    let mut found = Vec::new();
    for (_, clustering) in db.clusterings() {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for cluster in &clustering.clusters {
            for &gene in &cluster.genes {
                if !seen.insert(gene) && reported.insert(gene) {
                    found.push((clustering.name.clone(), db.gene_name(gene).to_string()));
                }
            }
        }
    }
    found
}

/// Find matrices whose value buffer does not match their shape
///
/// Returns (matrix, expected values, actual values) tuples.
pub fn find_misshapen_matrices(db: &Database) -> Vec<(String, usize, usize)> {
    db.gene_expression_matrices()
        .filter_map(|(_, m)| {
            let expected = m.n_rows() * m.n_cols();
            (m.values().len() != expected).then(|| (m.name.clone(), expected, m.values().len()))
        })
        .collect()
}

/// Find matrix rows belonging to a gene of another collection than the
/// matrix's
///
/// Returns (matrix, gene) tuples.
pub fn find_foreign_matrix_genes(db: &Database) -> Vec<(String, String)> {
    let mut foreign = Vec::new();
    for (_, matrix) in db.gene_expression_matrices() {
        let Some(collection) = matrix.collection else {
            continue;
        };
        for &gene in matrix.genes() {
            if db.gene(gene).collection != collection {
                foreign.push((matrix.name.clone(), db.gene_name(gene).to_string()));
            }
        }
    }
    foreign
}
