//! Functional annotation files: `gene<TAB>description`

use std::path::Path;

use coexpr_core::tabular::{parse_records, TabFormat};
use coexpr_core::Database;

use super::ImportSummary;
use crate::errors::{import_validation, read_input, Result};

const OP: &str = "import_functional_annotations";

/// Import a functional annotation file
///
/// Descriptions are trimmed; blank descriptions leave the variant as is.
/// A later annotation of the same variant replaces an earlier one.
///
/// ## Errors
///
/// - `ExErrorKind::Io`: the file cannot be read
/// - `ExErrorKind::InvalidInput`: a line does not have exactly 2 columns
pub fn import_functional_annotations(db: &mut Database, path: &Path) -> Result<ImportSummary> {
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

        if record.len() != 2 {
            return Err(import_validation(
                OP,
                path,
                format!(
                    "Expected line with 2 columns, but got {} columns",
                    record.len()
                ),
            )
            .with_line(record.line));
        }

        let description = record.field(1).unwrap_or_default();
        if description.is_empty() {
            continue;
        }

        let name = record.field(0).unwrap_or_default();
        match db.try_get_gene_variant(name) {
            Some(variant) => {
                db.set_functional_annotation(variant, description);
                summary.applied += 1;
            }
            None => {
                tracing::warn!(
                    path = %path.display(),
                    line = record.line,
                    gene = name,
                    "Gene of unknown collection, skipping annotation"
                );
                summary.skipped += 1;
            }
        }
    }

    tracing::debug!(
        path = %path.display(),
        records = summary.records,
        applied = summary.applied,
        "Imported functional annotations"
    );
    Ok(summary)
}
