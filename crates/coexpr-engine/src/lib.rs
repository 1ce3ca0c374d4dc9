//! coexpr engine - analysis and orchestration layer
//!
//! Turns a gene expression matrix and a bait set into ortholog-grouped
//! neighbours and ranked cluster candidates, and provides the command functions that coordinate the
//! in-memory database (core) with snapshots and importers (store).

pub mod baits;
pub mod commands;
pub mod correlation;
pub mod job;
pub mod neighbors;
pub mod ranking;
pub mod report;

pub use correlation::GeneCorrelationMatrix;
pub use neighbors::{BaitCorrelation, NeighborAggregator, Neighbors, OrthologGroupInfo, Thresholds};
pub use ranking::{rank_genes, ClusteringRanking, RankedGene};
pub use report::{JsonReportSink, NeighborReport, ReportSink};
