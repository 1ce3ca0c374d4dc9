//! Gene expression matrices
//!
//! Header: `<label><TAB>sample1<TAB>sample2…`; every following line is
//! `gene<TAB>value1<TAB>value2…`. The file is read twice: once to count
//! rows so storage is allocated exactly once, once to fill it.

use std::path::Path;

use coexpr_core::tabular::{count_records, parse_records, parse_value, TabFormat};
use coexpr_core::{CoexprError, Database, GeneExpressionMatrix, MatrixId};

use crate::errors::{import_validation, in_file, read_input, Result};

const OP: &str = "import_expression_matrix";

/// Import an expression matrix and register it under `name`
///
/// Rows of unknown genes are skipped with a warning once their values have
/// been validated. A splice variant row counts as a row of its gene.
///
/// ## Errors
///
/// - `ExErrorKind::Io`: the file cannot be read
/// - `ExErrorKind::InvalidInput`: missing or short header, a row whose
///   width differs from the header's, a value that is not a finite number,
///   a gene listed twice, or genes of different collections
/// - `ExErrorKind::AlreadyExists`: a matrix named `name` exists
pub fn import_expression_matrix(db: &mut Database, name: &str, path: &Path) -> Result<MatrixId> {
    let content = read_input(OP, path)?;

    // pass 1: size
    let data_rows = count_records(&content).saturating_sub(1);
    let mut records = parse_records(&content, TabFormat::TSV);
    let header = match records.next() {
        Some(header) => header.map_err(|e| in_file(OP, path)(CoexprError::from(e)))?,
        None => return Err(import_validation(OP, path, "Missing header line")),
    };
    if header.len() < 2 {
        return Err(import_validation(
            OP,
            path,
            format!(
                "Header must name at least one sample, got {} columns",
                header.len()
            ),
        )
        .with_line(header.line));
    }
    let width = header.len();
    let samples = header.fields[1..]
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    // pass 2: fill
    let mut matrix = GeneExpressionMatrix::with_capacity(name, samples, data_rows);
    let mut row_values = Vec::with_capacity(width - 1);
    let mut skipped = 0usize;
    for record in records {
        let record = record.map_err(|e| in_file(OP, path)(CoexprError::from(e)))?;
        if record.len() != width {
            return Err(in_file(OP, path)(CoexprError::RaggedRow {
                line: record.line,
                expected: width,
                found: record.len(),
            }));
        }

        row_values.clear();
        for (j, field) in record.fields[1..].iter().enumerate() {
            let value = parse_value(field, record.line, j + 2)
                .map_err(|e| in_file(OP, path)(CoexprError::from(e)))?;
            row_values.push(value);
        }

        let gene_name = record.field(0).unwrap_or_default();
        let Some(variant) = db.try_get_gene_variant(gene_name) else {
            tracing::warn!(
                path = %path.display(),
                line = record.line,
                gene = gene_name,
                "Gene of unknown collection, skipping row"
            );
            skipped += 1;
            continue;
        };
        let gene = db.variant(variant).gene();
        let collection = db.gene(gene).collection;

        match matrix.collection {
            None => matrix.collection = Some(collection),
            Some(expected) if expected != collection => {
                return Err(in_file(OP, path)(CoexprError::MixedGeneCollections {
                    entity: format!("gene expression matrix {}", name),
                    expected: db.collection(expected).name.clone(),
                    gene: gene_name.to_string(),
                })
                .with_line(record.line));
            }
            Some(_) => {}
        }

        if matrix.has_gene(gene) {
            return Err(in_file(OP, path)(CoexprError::DuplicateGeneRow {
                gene: gene_name.to_string(),
                line: record.line,
            }));
        }
        matrix
            .push_row(gene, &row_values, record.line)
            .map_err(in_file(OP, path))?;
    }
    matrix.shrink_to_fit();

    tracing::debug!(
        path = %path.display(),
        matrix = name,
        rows = matrix.n_rows(),
        columns = matrix.n_cols(),
        skipped = skipped,
        "Imported gene expression matrix"
    );

    db.add_gene_expression_matrix(matrix)
        .map_err(in_file(OP, path))
}
