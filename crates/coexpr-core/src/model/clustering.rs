use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{CollectionId, GeneId, MatrixId};

/// A named set of genes within a clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub genes: BTreeSet<GeneId>,
}

impl Cluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            genes: BTreeSet::new(),
        }
    }

    pub fn add(&mut self, gene: GeneId) {
        self.genes.insert(gene);
    }

    pub fn contains(&self, gene: GeneId) -> bool {
        self.genes.contains(&gene)
    }
}

/// A partition of (part of) a gene collection into clusters
///
/// No gene belongs to more than one cluster; clusters are ordered by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    pub name: String,
    pub collection: Option<CollectionId>,
    /// Matrix the clustering was computed from, if any
    pub expression_matrix: Option<MatrixId>,
    pub clusters: Vec<Cluster>,
}

impl Clustering {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: None,
            expression_matrix: None,
            clusters: Vec::new(),
        }
    }

    /// The cluster containing `gene`, if any
    pub fn cluster_of(&self, gene: GeneId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.contains(gene))
    }

    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }
}
