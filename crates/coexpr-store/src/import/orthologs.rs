//! Ortholog tables: `family<TAB>gene1<TAB>gene2…`
//!
//! Each row names an external family and its member genes. When a row lists
//! a gene that is already grouped elsewhere, the row's group is absorbed by
//! that group and the rest of the row goes there too, so genes linked
//! through any chain of rows end up together. A default singleton group
//! never absorbs anything: it is dissolved and its gene joins the row.

use std::path::Path;

use coexpr_core::tabular::{parse_records, TabFormat};
use coexpr_core::{Database, FamilyId, GroupId};

use crate::errors::{in_file, read_input, Result};

const OP: &str = "import_orthologs";

/// What an ortholog import did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrthologImportSummary {
    pub records: usize,
    /// Rows with fewer than 3 columns
    pub short_rows: usize,
    pub groups_created: usize,
    pub merges: usize,
    pub genes_added: usize,
    /// Names no gene collection claims
    pub unknown_genes: usize,
    pub splice_variants_skipped: usize,
    /// Singleton groups dissolved because a family claimed their gene
    pub singletons_dissolved: usize,
    /// Groups left without a single known gene
    pub empty_groups_removed: usize,
}

/// Import an ortholog table, tagging its families with `source`
///
/// Merge direction: when a row names a gene that already belongs to another
/// explicit group, the row's own group is the one absorbed. After rows
/// `F1 X Y` and `F2 Y Z` only the `F1` group remains, holding X, Y and Z
/// and both family ids; `F2` still resolves to it through
/// [`Database::ortholog_group_by_family`].
///
/// ## Errors
///
/// - `ExErrorKind::Io`: the file cannot be read
pub fn import_orthologs(
    db: &mut Database,
    path: &Path,
    source: &str,
) -> Result<OrthologImportSummary> {
    let content = read_input(OP, path)?;
    let mut summary = OrthologImportSummary::default();
    let mut created: Vec<GroupId> = Vec::new();

    for record in parse_records(&content, TabFormat::TSV) {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %path.display(), "{}", e);
                continue;
            }
        };
        summary.records += 1;

        if record.len() < 3 {
            tracing::warn!(
                path = %path.display(),
                line = record.line,
                "Encountered line in ortholog file with {} < 3 columns",
                record.len()
            );
            summary.short_rows += 1;
            continue;
        }

        let family = FamilyId::new(source, record.field(0).unwrap_or_default());
        let mut group = match db.ortholog_group_by_family(&family) {
            Some(group) => group,
            None => {
                let group = db.add_ortholog_group(family).map_err(in_file(OP, path))?;
                created.push(group);
                summary.groups_created += 1;
                group
            }
        };

        for i in 1..record.len() {
            let name = record.field(i).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let Some(variant) = db.try_get_gene_variant(name) else {
                summary.unknown_genes += 1;
                continue;
            };
            if db.variant(variant).is_splice_variant() {
                tracing::warn!(
                    path = %path.display(),
                    line = record.line,
                    gene = name,
                    "Ignoring splice variant in orthologs file"
                );
                summary.splice_variants_skipped += 1;
                continue;
            }

            let gene = db.variant(variant).gene();
            if db.release_singleton(gene) {
                summary.singletons_dissolved += 1;
            }
            match db.gene(gene).ortholog_group {
                // listed twice, or already pulled in by an earlier merge
                Some(current) if current == group => {}
                Some(current) => {
                    tracing::warn!(
                        path = %path.display(),
                        line = record.line,
                        gene = name,
                        "Groups overlap: merging {} into {}",
                        group_name(db, group),
                        group_name(db, current)
                    );
                    db.merge_ortholog_groups(current, group)
                        .map_err(in_file(OP, path))?;
                    group = current;
                    summary.merges += 1;
                }
                None => {
                    db.add_to_ortholog_group(group, gene)
                        .map_err(in_file(OP, path))?;
                    summary.genes_added += 1;
                }
            }
        }
    }

    if summary.unknown_genes > 0 {
        tracing::warn!(
            path = %path.display(),
            "Ignored {} genes of unrecognised gene collections",
            summary.unknown_genes
        );
    }

    for group in created {
        if db.remove_ortholog_group_if_empty(group) {
            summary.empty_groups_removed += 1;
        }
    }

    tracing::debug!(
        path = %path.display(),
        source = source,
        groups_created = summary.groups_created,
        merges = summary.merges,
        singletons_dissolved = summary.singletons_dissolved,
        "Imported orthologs"
    );
    Ok(summary)
}

fn group_name(db: &Database, group: GroupId) -> String {
    db.ortholog_group(group)
        .map(|g| g.name.clone())
        .unwrap_or_else(|_| group.to_string())
}
