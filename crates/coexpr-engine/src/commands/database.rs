//! Database command handlers: create, add, verify, dump.
//!
//! `create` and `add` apply an update description and save the snapshot
//! only when the whole update succeeded and the result passes validation.
//! `verify` and `dump` open the snapshot read-only.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::time::Instant;

use coexpr_core::rules::validation::validate_database;
use coexpr_core::{log_op_end, log_op_error, log_op_start, Database};
use coexpr_core_types::RunContext;
use coexpr_store::dump::dump_yaml;
use coexpr_store::errors::Result;
use coexpr_store::import::{apply_update, load_update_description, UpdateSummary};
use coexpr_store::Session;

/// Entity counts of a database
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    pub collections: usize,
    pub genes: usize,
    pub variants: usize,
    pub ortholog_groups: usize,
    pub expression_matrices: usize,
    pub clusterings: usize,
}

impl DatabaseStats {
    pub fn of(db: &Database) -> Self {
        Self {
            collections: db.collections().count(),
            genes: db.gene_count(),
            variants: db.variant_count(),
            ortholog_groups: db.ortholog_group_count(),
            expression_matrices: db.gene_expression_matrices().count(),
            clusterings: db.clusterings().count(),
        }
    }
}

/// Create a database at `path`, optionally filled from an update description
///
/// ## Errors
///
/// - `AlreadyExists`: a file exists at `path`
/// - any import error of the update; nothing is written then
/// - `InvariantViolation`: the result is inconsistent; nothing is written
pub fn database_create(path: &Path, update: Option<&Path>) -> Result<UpdateSummary> {
    let ctx = RunContext::new("database_create");
    log_op_start!(
        "database_create",
        run_id = %ctx.run_id,
        path = %path.display()
    );
    let start = Instant::now();

    let summary = database_create_impl(path, update).map_err(|e| {
        log_op_error!(
            "database_create",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %ctx.run_id
        );
        e.with_run_id(ctx.run_id.clone())
    })?;

    log_op_end!(
        "database_create",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %ctx.run_id,
        collections = summary.gene_collections
    );
    Ok(summary)
}

fn database_create_impl(path: &Path, update: Option<&Path>) -> Result<UpdateSummary> {
    let mut session = Session::create(path)?;
    let summary = match update {
        Some(update) => {
            let description = load_update_description(update)?;
            apply_update(session.database_mut()?, &description)?
        }
        None => UpdateSummary::default(),
    };
    validate_database(session.database())?;
    session.close()?;
    Ok(summary)
}

/// Apply an update description to the database at `path`
///
/// ## Errors
///
/// - snapshot load errors
/// - any import error of the update; the snapshot is left untouched
/// - `InvariantViolation`: the result is inconsistent; nothing is written
pub fn database_add(path: &Path, update: &Path) -> Result<UpdateSummary> {
    let ctx = RunContext::new("database_add");
    log_op_start!(
        "database_add",
        run_id = %ctx.run_id,
        path = %path.display(),
        update = %update.display()
    );
    let start = Instant::now();

    let summary = database_add_impl(path, update).map_err(|e| {
        log_op_error!(
            "database_add",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %ctx.run_id
        );
        e.with_run_id(ctx.run_id.clone())
    })?;

    log_op_end!(
        "database_add",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %ctx.run_id,
        matrices = summary.expression_matrices,
        singletons = summary.singleton_groups
    );
    Ok(summary)
}

fn database_add_impl(path: &Path, update: &Path) -> Result<UpdateSummary> {
    let description = load_update_description(update)?;
    let mut session = Session::open(path)?;
    let summary = apply_update(session.database_mut()?, &description)?;
    validate_database(session.database())?;
    session.close()?;
    Ok(summary)
}

/// Check every invariant of the database at `path`
///
/// ## Errors
///
/// - snapshot load errors (including a digest mismatch)
/// - `InvariantViolation`: the first violation found
pub fn database_verify(path: &Path) -> Result<DatabaseStats> {
    let ctx = RunContext::new("database_verify");
    log_op_start!(
        "database_verify",
        run_id = %ctx.run_id,
        path = %path.display()
    );
    let start = Instant::now();

    let stats = database_verify_impl(path).map_err(|e| {
        log_op_error!(
            "database_verify",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %ctx.run_id
        );
        e.with_run_id(ctx.run_id.clone())
    })?;

    log_op_end!(
        "database_verify",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %ctx.run_id,
        genes = stats.genes,
        groups = stats.ortholog_groups
    );
    Ok(stats)
}

fn database_verify_impl(path: &Path) -> Result<DatabaseStats> {
    let session = Session::open_read_only(path)?;
    validate_database(session.database())?;
    Ok(DatabaseStats::of(session.database()))
}

/// Write a YAML view of the database at `path` to `out`
///
/// ## Errors
///
/// Snapshot load errors or failure to write `out`.
pub fn database_dump(path: &Path, out: &Path) -> Result<()> {
    let ctx = RunContext::new("database_dump");
    log_op_start!(
        "database_dump",
        run_id = %ctx.run_id,
        path = %path.display(),
        out = %out.display()
    );
    let start = Instant::now();

    Session::open_read_only(path)
        .and_then(|session| dump_yaml(session.database(), out))
        .map_err(|e| {
            log_op_error!(
                "database_dump",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %ctx.run_id
            );
            e.with_run_id(ctx.run_id.clone())
        })?;

    log_op_end!(
        "database_dump",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %ctx.run_id
    );
    Ok(())
}
