use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::GeneId;

/// External family identifier, e.g. `plaza:HOM000123`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FamilyId {
    pub source: String,
    pub id: String,
}

impl FamilyId {
    pub fn new(source: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Imported from an external family source
    Explicit,
    /// Synthesized for a gene no family claimed
    Singleton,
}

/// A set of genes believed to be orthologous
///
/// Member genes point back at their group through
/// [`Gene::ortholog_group`](super::Gene::ortholog_group); the
/// [`Database`](crate::ops::Database) keeps both sides in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthologGroup {
    /// Registry key, unique across the database
    pub name: String,
    pub kind: GroupKind,
    pub external_ids: BTreeSet<FamilyId>,
    pub genes: BTreeSet<GeneId>,
}

impl OrthologGroup {
    pub(crate) fn explicit(family: FamilyId) -> Self {
        let mut external_ids = BTreeSet::new();
        let name = family.to_string();
        external_ids.insert(family);
        Self {
            name,
            kind: GroupKind::Explicit,
            external_ids,
            genes: BTreeSet::new(),
        }
    }

    pub(crate) fn singleton(name: String, gene: GeneId) -> Self {
        Self {
            name,
            kind: GroupKind::Singleton,
            external_ids: BTreeSet::new(),
            genes: BTreeSet::from([gene]),
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.kind == GroupKind::Singleton
    }

    pub fn contains(&self, gene: GeneId) -> bool {
        self.genes.contains(&gene)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}
