use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CoexprError, Result};
use crate::model::{
    Clustering, ClusteringId, CollectionId, Gene, GeneCollection, GeneExpressionMatrix, GeneId,
    GeneVariant, GroupId, MatrixId, NameMatch, OrthologGroup, VariantId, VariantKind,
};

/// The root aggregate owning every entity
///
/// Entities are stored in arenas and addressed by typed indices. The
/// name indices are not serialized; call [`Database::reindex`] after
/// deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub(crate) collections: Vec<GeneCollection>,
    pub(crate) genes: Vec<Gene>,
    pub(crate) variants: Vec<GeneVariant>,
    /// Merged-away groups leave an empty slot behind
    pub(crate) groups: Vec<Option<OrthologGroup>>,
    pub(crate) matrices: Vec<GeneExpressionMatrix>,
    pub(crate) clusterings: Vec<Clustering>,
    /// Next number handed out to a singleton group name
    pub(crate) next_singleton: u64,

    #[serde(skip)]
    pub(crate) variant_index: HashMap<String, VariantId>,
    #[serde(skip)]
    pub(crate) group_index: HashMap<String, GroupId>,
    /// External family key to the group currently holding that family
    #[serde(skip)]
    pub(crate) family_index: HashMap<String, GroupId>,
    #[serde(skip)]
    pub(crate) matrix_index: HashMap<String, MatrixId>,
    #[serde(skip)]
    pub(crate) clustering_index: HashMap<String, ClusteringId>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild name indices and compiled patterns
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if a stored collection pattern no longer
    /// compiles.
    pub fn reindex(&mut self) -> Result<()> {
        for collection in &mut self.collections {
            collection.compile()?;
        }
        for matrix in &mut self.matrices {
            matrix.reindex();
        }
        self.variant_index = self
            .variants
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.clone(), VariantId::from_index(i)))
            .collect();
        self.group_index = self
            .groups
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.as_ref().map(|g| (g.name.clone(), GroupId::from_index(i))))
            .collect();
        self.family_index = self
            .groups
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.as_ref().map(|g| (GroupId::from_index(i), g)))
            .flat_map(|(id, g)| g.external_ids.iter().map(move |f| (f.to_string(), id)))
            .collect();
        self.matrix_index = self
            .matrices
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), MatrixId::from_index(i)))
            .collect();
        self.clustering_index = self
            .clusterings
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), ClusteringId::from_index(i)))
            .collect();
        Ok(())
    }

    // Gene collections

    /// Register a gene collection
    ///
    /// Collections are consulted in registration order when resolving a
    /// name; the first one whose patterns match wins.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a collection of that name exists.
    pub fn add_gene_collection(&mut self, collection: GeneCollection) -> Result<CollectionId> {
        if self.collections.iter().any(|c| c.name == collection.name) {
            return Err(CoexprError::AlreadyExists {
                kind: "gene collection",
                name: collection.name,
            });
        }
        let id = CollectionId::next_id(self.collections.len())?;
        self.collections.push(collection);
        Ok(id)
    }

    pub fn collection(&self, id: CollectionId) -> &GeneCollection {
        &self.collections[id.index()]
    }

    pub fn collections(&self) -> impl Iterator<Item = (CollectionId, &GeneCollection)> {
        self.collections
            .iter()
            .enumerate()
            .map(|(i, c)| (CollectionId::from_index(i), c))
    }

    // Genes and variants

    /// Resolve a gene or splice variant name, creating entities on first
    /// reference
    ///
    /// A splice variant name also creates its parent gene.
    ///
    /// # Errors
    ///
    /// Returns `GeneNotFound` if no collection claims the name.
    pub fn get_gene_variant(&mut self, name: &str) -> Result<VariantId> {
        if let Some(&id) = self.variant_index.get(name) {
            return Ok(id);
        }

        let claim = self
            .collections
            .iter()
            .enumerate()
            .find_map(|(i, c)| c.classify(name).map(|m| (CollectionId::from_index(i), m)));

        match claim {
            Some((collection, NameMatch::Gene)) => {
                let gene = self.ensure_gene(collection, name)?;
                Ok(self.genes[gene.index()].variant)
            }
            Some((collection, NameMatch::SpliceVariant { gene_name })) => {
                let gene = self.ensure_gene(collection, &gene_name)?;
                let id =
                    self.push_variant(GeneVariant::new(name, VariantKind::SpliceVariant(gene)))?;
                self.genes[gene.index()].splice_variants.push(id);
                Ok(id)
            }
            None => Err(CoexprError::GeneNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Like [`get_gene_variant`](Self::get_gene_variant) but a miss is `None`
    pub fn try_get_gene_variant(&mut self, name: &str) -> Option<VariantId> {
        self.get_gene_variant(name).ok()
    }

    /// Resolve a gene name, creating the gene on first reference
    ///
    /// # Errors
    ///
    /// Returns `GeneNotFound` if no collection claims the name and
    /// `SpliceVariantInsteadOfGene` if it names a splice variant.
    pub fn get_gene(&mut self, name: &str) -> Result<GeneId> {
        let id = self.get_gene_variant(name)?;
        self.variants[id.index()].as_gene()
    }

    /// Look up an existing gene without creating anything
    pub fn find_gene(&self, name: &str) -> Option<GeneId> {
        let id = self.variant_index.get(name)?;
        match self.variants[id.index()].kind {
            VariantKind::Gene(gene) => Some(gene),
            VariantKind::SpliceVariant(_) => None,
        }
    }

    /// Look up an existing variant without creating anything
    pub fn find_gene_variant(&self, name: &str) -> Option<VariantId> {
        self.variant_index.get(name).copied()
    }

    pub fn gene(&self, id: GeneId) -> &Gene {
        &self.genes[id.index()]
    }

    pub fn gene_name(&self, id: GeneId) -> &str {
        &self.genes[id.index()].name
    }

    pub fn variant(&self, id: VariantId) -> &GeneVariant {
        &self.variants[id.index()]
    }

    pub fn genes(&self) -> impl Iterator<Item = (GeneId, &Gene)> {
        self.genes
            .iter()
            .enumerate()
            .map(|(i, g)| (GeneId::from_index(i), g))
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Attach a functional annotation, replacing any previous one
    pub fn set_functional_annotation(&mut self, variant: VariantId, annotation: impl Into<String>) {
        self.variants[variant.index()].functional_annotation = Some(annotation.into());
    }

    /// Declare two variants highly similar; the relation is symmetric
    pub fn add_highly_similar(&mut self, a: VariantId, b: VariantId) {
        if a == b {
            return;
        }
        let a_name = self.variants[a.index()].name.clone();
        let b_name = self.variants[b.index()].name.clone();
        self.variants[a.index()].highly_similar.insert(b_name);
        self.variants[b.index()].highly_similar.insert(a_name);
    }

    fn ensure_gene(&mut self, collection: CollectionId, name: &str) -> Result<GeneId> {
        if let Some(&id) = self.variant_index.get(name) {
            return Ok(self.variants[id.index()].gene());
        }
        let gene = GeneId::next_id(self.genes.len())?;
        let variant = self.push_variant(GeneVariant::new(name, VariantKind::Gene(gene)))?;
        self.genes.push(Gene {
            name: name.to_string(),
            collection,
            variant,
            splice_variants: Vec::new(),
            ortholog_group: None,
        });
        Ok(gene)
    }

    fn push_variant(&mut self, variant: GeneVariant) -> Result<VariantId> {
        let id = VariantId::next_id(self.variants.len())?;
        self.variant_index.insert(variant.name.clone(), id);
        self.variants.push(variant);
        Ok(id)
    }

    // Expression matrices

    /// Register an expression matrix under its name
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the name is taken.
    pub fn add_gene_expression_matrix(
        &mut self,
        mut matrix: GeneExpressionMatrix,
    ) -> Result<MatrixId> {
        if self.matrix_index.contains_key(&matrix.name) {
            return Err(CoexprError::AlreadyExists {
                kind: "expression matrix",
                name: matrix.name,
            });
        }
        matrix.reindex();
        let id = MatrixId::next_id(self.matrices.len())?;
        self.matrix_index.insert(matrix.name.clone(), id);
        self.matrices.push(matrix);
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `MatrixNotFound` for an unknown name.
    pub fn gene_expression_matrix_id(&self, name: &str) -> Result<MatrixId> {
        self.matrix_index
            .get(name)
            .copied()
            .ok_or_else(|| CoexprError::MatrixNotFound {
                name: name.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns `MatrixNotFound` for an unknown name.
    pub fn gene_expression_matrix(&self, name: &str) -> Result<&GeneExpressionMatrix> {
        let id = self.gene_expression_matrix_id(name)?;
        Ok(&self.matrices[id.index()])
    }

    pub fn gene_expression_matrix_by_id(&self, id: MatrixId) -> &GeneExpressionMatrix {
        &self.matrices[id.index()]
    }

    pub fn gene_expression_matrices(
        &self,
    ) -> impl Iterator<Item = (MatrixId, &GeneExpressionMatrix)> {
        self.matrices
            .iter()
            .enumerate()
            .map(|(i, m)| (MatrixId::from_index(i), m))
    }

    // Clusterings

    /// Register a clustering under its name
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the name is taken.
    pub fn add_clustering(&mut self, clustering: Clustering) -> Result<ClusteringId> {
        if self.clustering_index.contains_key(&clustering.name) {
            return Err(CoexprError::AlreadyExists {
                kind: "clustering",
                name: clustering.name,
            });
        }
        let id = ClusteringId::next_id(self.clusterings.len())?;
        self.clustering_index.insert(clustering.name.clone(), id);
        self.clusterings.push(clustering);
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `ClusteringNotFound` for an unknown name.
    pub fn clustering(&self, name: &str) -> Result<&Clustering> {
        self.clustering_index
            .get(name)
            .map(|id| &self.clusterings[id.index()])
            .ok_or_else(|| CoexprError::ClusteringNotFound {
                name: name.to_string(),
            })
    }

    pub fn clusterings(&self) -> impl Iterator<Item = (ClusteringId, &Clustering)> {
        self.clusterings
            .iter()
            .enumerate()
            .map(|(i, c)| (ClusteringId::from_index(i), c))
    }
}
