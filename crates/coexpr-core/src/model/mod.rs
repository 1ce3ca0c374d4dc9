//! Entity model
//!
//! All entities live in arenas owned by [`Database`](crate::ops::Database).
//! Entities refer to each other through the typed indices defined here,
//! never through owning pointers: a gene's ortholog group is a [`GroupId`]
//! into the database's group table.

pub mod clustering;
pub mod expression_matrix;
pub mod gene;
pub mod gene_collection;
pub mod ortholog_group;

pub use clustering::{Cluster, Clustering};
pub use expression_matrix::GeneExpressionMatrix;
pub use gene::{Gene, GeneVariant, VariantKind};
pub use gene_collection::{GeneCollection, NameMatch};
pub use ortholog_group::{FamilyId, GroupKind, OrthologGroup};

use serde::{Deserialize, Serialize};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Position in the owning arena
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Id of an existing arena slot
            pub(crate) fn from_index(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "arena index {} overflows", index);
                Self(index as u32)
            }

            /// Id for the slot about to be pushed onto an arena of length `len`
            pub(crate) fn next_id(len: usize) -> Result<Self, crate::errors::CoexprError> {
                u32::try_from(len)
                    .map(Self)
                    .map_err(|_| crate::errors::CoexprError::Internal {
                        message: format!("{} arena is full ({} entries)", stringify!($name), len),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

arena_id!(
    /// Index of a [`GeneCollection`]
    CollectionId
);
arena_id!(
    /// Index of a [`Gene`]
    GeneId
);
arena_id!(
    /// Index of a [`GeneVariant`]
    VariantId
);
arena_id!(
    /// Index of an [`OrthologGroup`] slot; slots of merged groups stay empty
    GroupId
);
arena_id!(
    /// Index of a [`GeneExpressionMatrix`]
    MatrixId
);
arena_id!(
    /// Index of a [`Clustering`]
    ClusteringId
);
