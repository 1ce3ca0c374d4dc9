use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CollectionId, GeneId};
use crate::errors::{CoexprError, Result};

/// Expression values of genes (rows) across samples (columns)
///
/// Values are stored row-major in one contiguous buffer of
/// `n_rows * n_cols` finite numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneExpressionMatrix {
    pub name: String,
    pub collection: Option<CollectionId>,
    samples: Vec<String>,
    genes: Vec<GeneId>,
    values: Vec<f64>,

    #[serde(skip)]
    rows_by_gene: HashMap<GeneId, usize>,
}

impl GeneExpressionMatrix {
    /// Empty matrix with room for `rows` rows, so that filling it never
    /// reallocates.
    pub fn with_capacity(name: impl Into<String>, samples: Vec<String>, rows: usize) -> Self {
        let cols = samples.len();
        Self {
            name: name.into(),
            collection: None,
            samples,
            genes: Vec::with_capacity(rows),
            values: Vec::with_capacity(rows.saturating_mul(cols)),
            rows_by_gene: HashMap::with_capacity(rows),
        }
    }

    /// Build a complete matrix from row-major values
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the buffer does not fit the shape, and
    /// `InvalidValue` on a non-finite value.
    pub fn from_rows(
        name: impl Into<String>,
        collection: Option<CollectionId>,
        samples: Vec<String>,
        rows: Vec<(GeneId, Vec<f64>)>,
    ) -> Result<Self> {
        let mut matrix = Self::with_capacity(name, samples, rows.len());
        matrix.collection = collection;
        for (i, (gene, values)) in rows.into_iter().enumerate() {
            matrix.push_row(gene, &values, i + 2)?;
        }
        Ok(matrix)
    }

    /// Append one gene's row
    ///
    /// `line` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns `RaggedRow` on a width mismatch, `InvalidValue` on a
    /// non-finite value and `DuplicateGeneRow` if the gene already has a row.
    pub fn push_row(&mut self, gene: GeneId, values: &[f64], line: usize) -> Result<usize> {
        if values.len() != self.n_cols() {
            return Err(CoexprError::RaggedRow {
                line,
                expected: self.n_cols(),
                found: values.len(),
            });
        }
        if let Some(column) = values.iter().position(|v| !v.is_finite()) {
            return Err(CoexprError::InvalidValue {
                line,
                column: column + 1,
                field: values[column].to_string(),
            });
        }
        if self.rows_by_gene.contains_key(&gene) {
            return Err(CoexprError::DuplicateGeneRow {
                gene: gene.to_string(),
                line,
            });
        }
        let row = self.genes.len();
        self.genes.push(gene);
        self.values.extend_from_slice(values);
        self.rows_by_gene.insert(gene, row);
        Ok(row)
    }

    /// Release capacity reserved for rows that were never filled
    pub fn shrink_to_fit(&mut self) {
        self.genes.shrink_to_fit();
        self.values.shrink_to_fit();
    }

    pub fn n_rows(&self) -> usize {
        self.genes.len()
    }

    pub fn n_cols(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn genes(&self) -> &[GeneId] {
        &self.genes
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let cols = self.n_cols();
        &self.values[row * cols..(row + 1) * cols]
    }

    pub fn gene(&self, row: usize) -> GeneId {
        self.genes[row]
    }

    pub fn row_of(&self, gene: GeneId) -> Option<usize> {
        self.rows_by_gene.get(&gene).copied()
    }

    pub fn has_gene(&self, gene: GeneId) -> bool {
        self.rows_by_gene.contains_key(&gene)
    }

    /// Rebuild the gene lookup; required after deserialization
    pub fn reindex(&mut self) {
        self.rows_by_gene = self
            .genes
            .iter()
            .enumerate()
            .map(|(row, gene)| (*gene, row))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("s{}", i)).collect()
    }

    #[test]
    fn test_push_row_and_lookup() {
        let mut m = GeneExpressionMatrix::with_capacity("m", samples(3), 2);
        m.push_row(GeneId(7), &[1.0, 2.0, 3.0], 2).unwrap();
        m.push_row(GeneId(4), &[4.0, 5.0, 6.0], 3).unwrap();

        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.row_of(GeneId(7)), Some(0));
        assert_eq!(m.gene(1), GeneId(4));
        assert!(!m.has_gene(GeneId(1)));
    }

    #[test]
    fn test_filling_within_capacity_does_not_reallocate() {
        let mut m = GeneExpressionMatrix::with_capacity("m", samples(2), 3);
        let before = m.values().as_ptr();
        for g in 0..3 {
            m.push_row(GeneId(g), &[1.0, 2.0], 2).unwrap();
        }
        assert_eq!(m.values().as_ptr(), before);
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut m = GeneExpressionMatrix::with_capacity("m", samples(3), 1);
        let err = m.push_row(GeneId(0), &[1.0, 2.0], 5).unwrap_err();
        assert!(matches!(
            err,
            CoexprError::RaggedRow {
                line: 5,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let mut m = GeneExpressionMatrix::with_capacity("m", samples(2), 1);
        let err = m.push_row(GeneId(0), &[1.0, f64::NAN], 2).unwrap_err();
        assert!(matches!(err, CoexprError::InvalidValue { column: 2, .. }));
    }

    #[test]
    fn test_duplicate_gene_rejected() {
        let mut m = GeneExpressionMatrix::with_capacity("m", samples(1), 2);
        m.push_row(GeneId(0), &[1.0], 2).unwrap();
        let err = m.push_row(GeneId(0), &[2.0], 3).unwrap_err();
        assert!(matches!(err, CoexprError::DuplicateGeneRow { line: 3, .. }));
    }

    #[test]
    fn test_reindex_after_deserialize() {
        let m = GeneExpressionMatrix::from_rows(
            "m",
            None,
            samples(1),
            vec![(GeneId(2), vec![1.0]), (GeneId(9), vec![3.0])],
        )
        .unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let mut back: GeneExpressionMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back.row_of(GeneId(9)), None);
        back.reindex();
        assert_eq!(back.row_of(GeneId(9)), Some(1));
        assert_eq!(back, m);
    }
}
