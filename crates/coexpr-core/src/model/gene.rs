use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{CollectionId, GeneId, GroupId, VariantId};
use crate::errors::{CoexprError, Result};

/// A gene of one collection
///
/// Every gene owns a canonical variant carrying the gene's own name, plus any
/// splice variants seen so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub name: String,
    pub collection: CollectionId,
    /// Canonical variant
    pub variant: VariantId,
    pub splice_variants: Vec<VariantId>,
    /// Back-reference kept in sync with the group's member set
    pub ortholog_group: Option<GroupId>,
}

/// What a variant is a variant of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "gene", rename_all = "snake_case")]
pub enum VariantKind {
    /// The canonical variant of a gene
    Gene(GeneId),
    /// A splice variant of a gene
    SpliceVariant(GeneId),
}

/// A named gene or splice variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneVariant {
    pub name: String,
    pub kind: VariantKind,
    pub functional_annotation: Option<String>,
    /// Names of variants declared highly similar (symmetric)
    pub highly_similar: BTreeSet<String>,
}

impl GeneVariant {
    pub(crate) fn new(name: impl Into<String>, kind: VariantKind) -> Self {
        Self {
            name: name.into(),
            kind,
            functional_annotation: None,
            highly_similar: BTreeSet::new(),
        }
    }

    /// The gene this variant belongs to
    pub fn gene(&self) -> GeneId {
        match self.kind {
            VariantKind::Gene(gene) | VariantKind::SpliceVariant(gene) => gene,
        }
    }

    /// The gene this variant is the canonical variant of
    ///
    /// # Errors
    ///
    /// Returns `SpliceVariantInsteadOfGene` for a splice variant.
    pub fn as_gene(&self) -> Result<GeneId> {
        match self.kind {
            VariantKind::Gene(gene) => Ok(gene),
            VariantKind::SpliceVariant(_) => Err(CoexprError::SpliceVariantInsteadOfGene {
                name: self.name.clone(),
            }),
        }
    }

    pub fn is_splice_variant(&self) -> bool {
        matches!(self.kind, VariantKind::SpliceVariant(_))
    }
}
