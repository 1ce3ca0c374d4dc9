//! Candidate ranking inside clusterings
//!
//! Within a cluster, the baits it shares with the matrix vote for the other
//! members: each candidate scores the mean of its correlations with those
//! baits. Clusters without a bait, or with nothing but baits, contribute
//! nothing.

use std::cmp::Ordering;

use coexpr_core::{Clustering, GeneExpressionMatrix, GeneId, MatrixId};

use crate::correlation::GeneCorrelationMatrix;

/// A candidate and its score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedGene {
    pub gene: GeneId,
    pub cluster: String,
    /// Mean correlation with the baits of `cluster`
    pub score: f64,
    /// Number of baits the score averages over
    pub baits: usize,
}

/// Candidates of one clustering against one matrix, best first
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringRanking {
    pub clustering: String,
    pub matrix: String,
    pub ranked: Vec<RankedGene>,
}

impl ClusteringRanking {
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Whether `clustering` describes the genes of `matrix`
///
/// A clustering tied to a matrix only ranks against that matrix; an untied
/// one ranks against any matrix of its gene collection.
pub fn ranks_against(
    clustering: &Clustering,
    matrix_id: MatrixId,
    matrix: &GeneExpressionMatrix,
) -> bool {
    match clustering.expression_matrix {
        Some(id) => id == matrix_id,
        None => clustering.collection.is_some() && clustering.collection == matrix.collection,
    }
}

/// Rank the non-bait genes of every cluster by their mean bait correlation
///
/// Only genes with a row in `matrix` take part. The result is sorted by
/// descending score; `NaN` scores come last and ties go by gene id.
pub fn rank_genes(
    matrix: &GeneExpressionMatrix,
    clustering: &Clustering,
    correlations: &GeneCorrelationMatrix,
) -> ClusteringRanking {
    let mut ranked = Vec::new();
    for cluster in &clustering.clusters {
        let mut columns = Vec::new();
        let mut candidates = Vec::new();
        for &gene in &cluster.genes {
            let Some(row) = matrix.row_of(gene) else {
                continue;
            };
            match correlations.column_index(row) {
                Some(column) => columns.push(column),
                None => candidates.push((gene, row)),
            }
        }
        if columns.is_empty() || candidates.is_empty() {
            continue;
        }

        let n = columns.len() as f64;
        for (gene, row) in candidates {
            let sum: f64 = columns.iter().map(|&c| correlations.get(row, c)).sum();
            ranked.push(RankedGene {
                gene,
                cluster: cluster.name.clone(),
                score: sum / n,
                baits: columns.len(),
            });
        }
    }
    ranked.sort_by(|a, b| by_score(a.score, b.score).then(a.gene.cmp(&b.gene)));

    tracing::debug!(
        clustering = %clustering.name,
        matrix = %matrix.name,
        ranked = ranked.len(),
        "Ranked cluster candidates"
    );
    ClusteringRanking {
        clustering: clustering.name.clone(),
        matrix: matrix.name.clone(),
        ranked,
    }
}

/// Descending, `NaN` last
fn by_score(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}
