//! Neighbour reports and where they go
//!
//! A [`NeighborReport`] is the name-resolved, serializable view of a run's
//! result: neighbour groups and cluster rankings. Sinks decide the output format; [`JsonReportSink`] writes one
//! JSON document.

use std::path::{Path, PathBuf};

use coexpr_core::{Database, GeneId, GroupKind};
use coexpr_store::atomic::atomic_write;
use coexpr_store::errors::{serialization_error, Result};
use serde::Serialize;

use crate::neighbors::{Neighbors, Thresholds};
use crate::ranking::ClusteringRanking;

/// Destination of a neighbour report
pub trait ReportSink {
    /// ## Errors
    ///
    /// Whatever prevents the sink from storing the report.
    fn write(&mut self, report: &NeighborReport) -> Result<()>;
}

/// Keeps reports in memory
impl ReportSink for Vec<NeighborReport> {
    fn write(&mut self, report: &NeighborReport) -> Result<()> {
        self.push(report.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborReport {
    pub run_id: String,
    pub baits: Vec<String>,
    pub thresholds: Thresholds,
    pub neighbors: Vec<NeighborGroup>,
    pub rankings: Vec<RankingReport>,
}

/// One neighbouring ortholog group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborGroup {
    pub name: String,
    pub kind: GroupKind,
    pub external_ids: Vec<String>,
    pub genes: Vec<String>,
    pub correlations: Vec<CorrelationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationEntry {
    pub gene: String,
    pub bait: String,
    pub correlation: f64,
}

/// Ranked candidates of one clustering against one matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    pub clustering: String,
    pub matrix: String,
    pub genes: Vec<RankedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub gene: String,
    pub cluster: String,
    /// `null` when a correlation was undefined
    pub score: f64,
    pub baits: usize,
}

impl NeighborReport {
    /// Resolve the ids of a run's result to names
    ///
    /// ## Errors
    ///
    /// `NotFound` if a neighbour group is no longer in `db`.
    pub fn build(
        db: &Database,
        run_id: impl Into<String>,
        baits: &[GeneId],
        thresholds: Thresholds,
        neighbors: &Neighbors,
        rankings: &[ClusteringRanking],
    ) -> Result<Self> {
        let name = |gene: GeneId| db.gene_name(gene).to_string();
        let mut groups = Vec::with_capacity(neighbors.len());
        for info in neighbors.iter() {
            let group = db.ortholog_group(info.group)?;
            groups.push(NeighborGroup {
                name: group.name.clone(),
                kind: group.kind,
                external_ids: group.external_ids.iter().map(|f| f.to_string()).collect(),
                genes: group.genes.iter().map(|&g| name(g)).collect(),
                correlations: info
                    .correlations
                    .iter()
                    .map(|c| CorrelationEntry {
                        gene: name(c.gene),
                        bait: name(c.bait),
                        correlation: c.correlation,
                    })
                    .collect(),
            });
        }
        let rankings = rankings
            .iter()
            .map(|ranking| RankingReport {
                clustering: ranking.clustering.clone(),
                matrix: ranking.matrix.clone(),
                genes: ranking
                    .ranked
                    .iter()
                    .map(|r| RankedEntry {
                        gene: name(r.gene),
                        cluster: r.cluster.clone(),
                        score: r.score,
                        baits: r.baits,
                    })
                    .collect(),
            })
            .collect();
        Ok(Self {
            run_id: run_id.into(),
            baits: baits.iter().map(|&g| name(g)).collect(),
            thresholds,
            neighbors: groups,
            rankings,
        })
    }
}

/// Writes the report as pretty-printed JSON to a file
#[derive(Debug, Clone)]
pub struct JsonReportSink {
    path: PathBuf,
}

impl JsonReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for JsonReportSink {
    fn write(&mut self, report: &NeighborReport) -> Result<()> {
        let json = serde_json::to_vec_pretty(report)
            .map_err(|e| serialization_error("write_report", e))?;
        atomic_write(&self.path, &json)?;
        tracing::debug!(
            path = %self.path.display(),
            neighbors = report.neighbors.len(),
            "Wrote neighbour report"
        );
        Ok(())
    }
}
