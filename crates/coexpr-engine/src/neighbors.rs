//! Neighbour aggregation
//!
//! A gene is a neighbour of a bait when their correlation lies strictly
//! outside the threshold band. Neighbours are reported per ortholog group:
//! every group of a neighbouring gene collects the (gene, bait,
//! correlation) evidence that put it there.

use std::collections::BTreeMap;

use coexpr_core::errors::{CoexprError, ExError};
use coexpr_core::{Database, GeneExpressionMatrix, GeneId, GroupId};
use coexpr_store::errors::Result;
use serde::Serialize;

use crate::correlation::GeneCorrelationMatrix;

/// Slack on the [-1, 1] threshold range for values written with rounding
const THRESHOLD_TOLERANCE: f64 = 1e-7;

/// Correlation band outside of which genes become neighbours
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    negative: f64,
    positive: f64,
}

impl Thresholds {
    /// ## Errors
    ///
    /// `InvalidInput` if a threshold lies outside [-1, 1].
    pub fn new(negative: f64, positive: f64) -> Result<Self> {
        check_threshold("negative_threshold", negative)?;
        check_threshold("positive_threshold", positive)?;
        Ok(Self { negative, positive })
    }

    pub fn negative(&self) -> f64 {
        self.negative
    }

    pub fn positive(&self) -> f64 {
        self.positive
    }

    /// Strictly below the negative or strictly above the positive threshold
    ///
    /// `NaN` never passes.
    pub fn passes(&self, correlation: f64) -> bool {
        correlation < self.negative || correlation > self.positive
    }
}

fn check_threshold(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value.abs() <= 1.0 + THRESHOLD_TOLERANCE {
        Ok(())
    } else {
        Err(ExError::from(CoexprError::ThresholdOutOfRange {
            name: name.to_string(),
            value,
        })
        .with_op("thresholds"))
    }
}

/// One piece of evidence: `gene` correlates with `bait`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaitCorrelation {
    pub gene: GeneId,
    pub bait: GeneId,
    pub correlation: f64,
}

/// Evidence gathered for one ortholog group
#[derive(Debug, Clone, PartialEq)]
pub struct OrthologGroupInfo {
    pub group: GroupId,
    pub correlations: Vec<BaitCorrelation>,
}

impl OrthologGroupInfo {
    fn new(group: GroupId) -> Self {
        Self {
            group,
            correlations: Vec::new(),
        }
    }

    pub fn add_bait_correlation(&mut self, gene: GeneId, bait: GeneId, correlation: f64) {
        self.correlations.push(BaitCorrelation {
            gene,
            bait,
            correlation,
        });
    }
}

/// Collects neighbour groups over one or more matrices
#[derive(Debug)]
pub struct NeighborAggregator {
    thresholds: Thresholds,
    groups: BTreeMap<GroupId, OrthologGroupInfo>,
}

impl NeighborAggregator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            groups: BTreeMap::new(),
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Record every neighbour of the baits of `correlations`
    ///
    /// Pairs of two bait rows are skipped. Returns the number of
    /// correlations recorded.
    pub fn add_matrix(
        &mut self,
        db: &Database,
        matrix: &GeneExpressionMatrix,
        correlations: &GeneCorrelationMatrix,
    ) -> usize {
        let mut recorded = 0;
        for (column, &bait_row) in correlations.bait_rows().iter().enumerate() {
            let bait = matrix.gene(bait_row);
            for row in 0..correlations.n_rows() {
                if correlations.is_bait_row(row) {
                    continue;
                }
                let correlation = correlations.get(row, column);
                if !self.thresholds.passes(correlation) {
                    continue;
                }
                let gene = matrix.gene(row);
                for group in db.ortholog_groups_of(gene) {
                    self.groups
                        .entry(group)
                        .or_insert_with(|| OrthologGroupInfo::new(group))
                        .add_bait_correlation(gene, bait, correlation);
                    recorded += 1;
                }
            }
        }

        tracing::debug!(
            matrix = %matrix.name,
            recorded,
            neighbors = self.groups.len(),
            "Aggregated neighbours"
        );
        recorded
    }

    pub fn finish(self) -> Neighbors {
        Neighbors {
            groups: self.groups.into_values().collect(),
        }
    }
}

/// Neighbour groups ordered by group id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbors {
    groups: Vec<OrthologGroupInfo>,
}

impl Neighbors {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrthologGroupInfo> {
        self.groups.iter()
    }

    pub fn get(&self, group: GroupId) -> Option<&OrthologGroupInfo> {
        self.groups
            .binary_search_by_key(&group, |info| info.group)
            .ok()
            .map(|i| &self.groups[i])
    }
}
