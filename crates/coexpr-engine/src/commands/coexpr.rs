//! Neighbour run orchestration.
//!
//! ## Pipeline (in order):
//! 1. Load the job description and check its thresholds
//! 2. Open the database read-only and take an in-memory copy
//! 3. Import the job's expression matrices (named by their path)
//! 4. If the job lists ortholog files: erase all families, import them
//! 5. Import the job's clusterings
//! 6. Reject genes present in more than one of the job's matrices
//! 7. Load baits, then give every gene without a group a singleton group
//! 8. Per matrix: correlate with its baits, aggregate neighbours, rank the
//!    candidates of every clustering of the matrix, write
//!    `<matrix file name>.correlation_matrix` to the output directory
//! 9. Hand the report to the sink
//!
//! The snapshot is never written back.

#![allow(clippy::result_large_err)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use coexpr_core::errors::CoexprError;
use coexpr_core::{log_op_end, log_op_error, log_op_start, Database, MatrixId};
use coexpr_core::{GeneExpressionMatrix, GeneId};
use coexpr_core_types::{RunContext, RunId};
use coexpr_store::atomic::atomic_write;
use coexpr_store::errors::{io_error, Result};
use coexpr_store::import::{import_clustering, import_expression_matrix, import_orthologs};
use coexpr_store::Session;

use crate::baits::load_baits;
use crate::correlation::GeneCorrelationMatrix;
use crate::job::load_job;
use crate::neighbors::{NeighborAggregator, Neighbors};
use crate::ranking::{rank_genes, ranks_against, ClusteringRanking};
use crate::report::{NeighborReport, ReportSink};

/// Suffix of the per-matrix correlation tables
pub const CORRELATION_FILE_SUFFIX: &str = ".correlation_matrix";

/// What a neighbour run produced
#[derive(Debug, Clone)]
pub struct CoexprOutcome {
    pub run_id: RunId,
    pub neighbors: Neighbors,
    pub rankings: Vec<ClusteringRanking>,
    pub report: NeighborReport,
    pub correlation_files: Vec<PathBuf>,
}

/// Find the co-expression neighbours of a job's baits
///
/// ## Errors
///
/// - job, bait or input file errors (`Io`, `InvalidInput`, `NotFound`,
///   `SpliceVariantMismatch`)
/// - snapshot load errors
/// - `InvalidInput`: a gene is present in more than one matrix
/// - any error of the report sink
pub fn coexpr_run(
    db_path: &Path,
    job_path: &Path,
    sink: &mut dyn ReportSink,
) -> Result<CoexprOutcome> {
    let ctx = RunContext::new("coexpr");
    log_op_start!(
        "coexpr_run",
        run_id = %ctx.run_id,
        path = %db_path.display(),
        job = %job_path.display()
    );
    let start = Instant::now();

    let outcome = coexpr_run_impl(&ctx, db_path, job_path, sink).map_err(|e| {
        log_op_error!(
            "coexpr_run",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %ctx.run_id
        );
        e.with_run_id(ctx.run_id.clone())
    })?;

    log_op_end!(
        "coexpr_run",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %ctx.run_id,
        baits = outcome.report.baits.len(),
        neighbors = outcome.neighbors.len(),
        rankings = outcome.rankings.len()
    );
    Ok(outcome)
}

fn coexpr_run_impl(
    ctx: &RunContext,
    db_path: &Path,
    job_path: &Path,
    sink: &mut dyn ReportSink,
) -> Result<CoexprOutcome> {
    let job = load_job(job_path)?;
    let thresholds = job.thresholds()?;

    let mut db = Session::open_read_only(db_path)?.into_database();

    let mut matrices = Vec::with_capacity(job.expression_matrices.len());
    for path in &job.expression_matrices {
        let name = path.display().to_string();
        matrices.push(import_expression_matrix(&mut db, &name, path)?);
    }

    if !job.orthologs.is_empty() {
        db.erase_families();
        for file in &job.orthologs {
            import_orthologs(&mut db, &file.path, &file.source)?;
        }
    }

    for clustering in &job.clusterings {
        import_clustering(&mut db, &clustering.name, &clustering.path, None)?;
    }

    ensure_disjoint(&db, &matrices)?;

    let baits = load_baits(&mut db, &job.baits)?;
    let singletons = db.assign_singleton_groups()?;
    tracing::debug!(run_id = %ctx.run_id, singletons, "Assigned singleton groups");

    let mut aggregator = NeighborAggregator::new(thresholds);
    let mut rankings = Vec::new();
    let mut correlation_files = Vec::with_capacity(matrices.len());
    for &id in &matrices {
        let matrix = db.gene_expression_matrix_by_id(id);
        let bait_rows: Vec<usize> = baits.iter().filter_map(|&g| matrix.row_of(g)).collect();
        if bait_rows.is_empty() {
            tracing::warn!(matrix = %matrix.name, "No baits in expression matrix");
        }
        let correlations = GeneCorrelationMatrix::compute(matrix, &bait_rows)?;
        aggregator.add_matrix(&db, matrix, &correlations);
        for (_, clustering) in db.clusterings() {
            if ranks_against(clustering, id, matrix) {
                rankings.push(rank_genes(matrix, clustering, &correlations));
            }
        }
        correlation_files.push(write_correlations(
            &db,
            matrix,
            &correlations,
            job.output_dir(),
        )?);
    }

    let neighbors = aggregator.finish();
    let report = NeighborReport::build(
        &db,
        ctx.run_id.as_str(),
        &baits,
        thresholds,
        &neighbors,
        &rankings,
    )?;
    sink.write(&report)?;

    Ok(CoexprOutcome {
        run_id: ctx.run_id.clone(),
        neighbors,
        rankings,
        report,
        correlation_files,
    })
}

/// A gene may only be present in one of the run's matrices
fn ensure_disjoint(db: &Database, matrices: &[MatrixId]) -> Result<()> {
    let mut seen: HashSet<GeneId> = HashSet::new();
    for &id in matrices {
        for &gene in db.gene_expression_matrix_by_id(id).genes() {
            if !seen.insert(gene) {
                return Err(CoexprError::GeneInMultipleMatrices {
                    gene: db.gene_name(gene).to_string(),
                }
                .into());
            }
        }
    }
    Ok(())
}

fn write_correlations(
    db: &Database,
    matrix: &GeneExpressionMatrix,
    correlations: &GeneCorrelationMatrix,
    output_dir: &Path,
) -> Result<PathBuf> {
    let file_name = Path::new(&matrix.name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| matrix.name.clone());
    let path = output_dir.join(format!("{}{}", file_name, CORRELATION_FILE_SUFFIX));

    let mut buffer = Vec::new();
    correlations
        .write_plain(db, matrix, &mut buffer)
        .map_err(|e| io_error("write_correlations", &path, e))?;
    atomic_write(&path, &buffer)?;
    Ok(path)
}
