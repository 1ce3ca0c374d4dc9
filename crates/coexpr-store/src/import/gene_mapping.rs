//! Gene mapping files: `canonical<TAB>alias1<TAB>alias2…`
//!
//! Every alias is recorded as highly similar to the canonical variant.

use std::path::Path;

use coexpr_core::tabular::{parse_records, TabFormat};
use coexpr_core::Database;

use super::ImportSummary;
use crate::errors::{import_validation, read_input, Result};

const OP: &str = "import_gene_mappings";

/// Import a gene mapping file
///
/// ## Errors
///
/// - `ExErrorKind::Io`: the file cannot be read
/// - `ExErrorKind::InvalidInput`: a line has fewer than 2 columns
pub fn import_gene_mappings(db: &mut Database, path: &Path) -> Result<ImportSummary> {
    let content = read_input(OP, path)?;
    let mut summary = ImportSummary::default();

    for record in parse_records(&content, TabFormat::TSV) {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %path.display(), "{}", e);
                summary.skipped += 1;
                continue;
            }
        };
        summary.records += 1;

        if record.len() < 2 {
            return Err(import_validation(
                OP,
                path,
                format!(
                    "Encountered line in mapping with {} < 2 columns",
                    record.len()
                ),
            )
            .with_line(record.line));
        }

        let canonical_name = record.field(0).unwrap_or_default();
        let Some(canonical) = db.try_get_gene_variant(canonical_name) else {
            tracing::warn!(
                path = %path.display(),
                line = record.line,
                gene = canonical_name,
                "Gene of unknown collection, skipping mapping"
            );
            summary.skipped += 1;
            continue;
        };

        let mut linked = false;
        for i in 1..record.len() {
            let alias_name = record.field(i).unwrap_or_default();
            if alias_name.is_empty() {
                continue;
            }
            match db.try_get_gene_variant(alias_name) {
                Some(alias) => {
                    db.add_highly_similar(canonical, alias);
                    linked = true;
                }
                None => {
                    tracing::warn!(
                        path = %path.display(),
                        line = record.line,
                        gene = alias_name,
                        "Gene of unknown collection, skipping alias"
                    );
                    summary.skipped += 1;
                }
            }
        }
        if linked {
            summary.applied += 1;
        }
    }

    tracing::debug!(
        path = %path.display(),
        records = summary.records,
        applied = summary.applied,
        "Imported gene mappings"
    );
    Ok(summary)
}
