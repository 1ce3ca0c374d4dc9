//! Pearson correlation of every matrix row against a set of bait rows.
//!
//! Each row is mean-centred and scaled to unit norm once; a correlation is
//! then the dot product of two standardized rows, summed in column order.
//! Rows are filled in parallel, but every cell is computed by the same
//! sequential sum, so the result does not depend on scheduling.

use std::io::Write;

use coexpr_core::errors::{CoexprError, ExError};
use coexpr_core::{Database, GeneExpressionMatrix};
use coexpr_store::errors::Result;
use rayon::prelude::*;

/// Correlations of all rows of one matrix against its bait rows
///
/// Row-major `n_rows × n_baits`. Column `c` holds the correlation with
/// `bait_rows()[c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneCorrelationMatrix {
    n_rows: usize,
    bait_rows: Vec<usize>,
    values: Vec<f64>,
}

impl GeneCorrelationMatrix {
    /// Correlate every row of `matrix` with each of `bait_rows`
    ///
    /// Bait rows are de-duplicated and sorted. Rows without variance
    /// correlate as `NaN` with everything.
    ///
    /// ## Errors
    ///
    /// `InvalidInput` if a bait row lies outside the matrix.
    pub fn compute(matrix: &GeneExpressionMatrix, bait_rows: &[usize]) -> Result<Self> {
        let n_rows = matrix.n_rows();
        let mut bait_rows = bait_rows.to_vec();
        bait_rows.sort_unstable();
        bait_rows.dedup();
        if let Some(&row) = bait_rows.iter().find(|&&row| row >= n_rows) {
            return Err(ExError::from(CoexprError::InvalidInput {
                reason: format!(
                    "Bait row {} out of range for matrix {} with {} rows",
                    row, matrix.name, n_rows
                ),
            })
            .with_op("compute_correlations"));
        }

        let standardized: Vec<Option<Vec<f64>>> = (0..n_rows)
            .into_par_iter()
            .map(|row| standardize(matrix.row(row)))
            .collect();

        let n_baits = bait_rows.len();
        let mut values = vec![f64::NAN; n_rows * n_baits];
        if n_baits > 0 {
            values
                .par_chunks_mut(n_baits)
                .enumerate()
                .for_each(|(row, out)| {
                    for (cell, &bait) in out.iter_mut().zip(&bait_rows) {
                        *cell = match (&standardized[row], &standardized[bait]) {
                            (Some(x), Some(y)) => dot(x, y).clamp(-1.0, 1.0),
                            _ => f64::NAN,
                        };
                    }
                });
        }

        tracing::debug!(
            matrix = %matrix.name,
            rows = n_rows,
            baits = n_baits,
            "Computed correlations"
        );

        Ok(Self {
            n_rows,
            bait_rows,
            values,
        })
    }

    /// Wrap precomputed correlations
    ///
    /// `bait_rows` must be sorted and unique, `values` row-major with one
    /// column per bait row.
    ///
    /// ## Errors
    ///
    /// `InvalidInput` if the shape does not add up or bait rows are not
    /// strictly increasing.
    pub fn from_parts(n_rows: usize, bait_rows: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        let invalid = |reason: String| {
            ExError::from(CoexprError::InvalidInput { reason }).with_op("correlation_from_parts")
        };
        if values.len() != n_rows * bait_rows.len() {
            return Err(invalid(format!(
                "Expected {} x {} correlations, got {}",
                n_rows,
                bait_rows.len(),
                values.len()
            )));
        }
        if bait_rows.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("Bait rows must be strictly increasing".to_string()));
        }
        if bait_rows.last().is_some_and(|&row| row >= n_rows) {
            return Err(invalid("Bait row out of range".to_string()));
        }
        Ok(Self {
            n_rows,
            bait_rows,
            values,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_baits(&self) -> usize {
        self.bait_rows.len()
    }

    /// Matrix rows used as baits, ascending
    pub fn bait_rows(&self) -> &[usize] {
        &self.bait_rows
    }

    /// Column holding the correlations with `bait_row`
    pub fn column_index(&self, bait_row: usize) -> Option<usize> {
        self.bait_rows.binary_search(&bait_row).ok()
    }

    pub fn is_bait_row(&self, row: usize) -> bool {
        self.column_index(row).is_some()
    }

    /// Correlation of `row` with the bait in `column`
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row * self.n_baits() + column]
    }

    /// Correlations of `row` with every bait
    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.n_baits();
        &self.values[row * n..(row + 1) * n]
    }

    /// Write the correlation table as TSV
    ///
    /// The header names the baits; each line holds a gene followed by its
    /// correlation with every bait.
    ///
    /// ## Errors
    ///
    /// Any error of the underlying writer.
    pub fn write_plain<W: Write>(
        &self,
        db: &Database,
        matrix: &GeneExpressionMatrix,
        out: &mut W,
    ) -> std::io::Result<()> {
        write!(out, "gene")?;
        for &bait in &self.bait_rows {
            write!(out, "\t{}", db.gene_name(matrix.gene(bait)))?;
        }
        writeln!(out)?;
        for row in 0..self.n_rows {
            write!(out, "{}", db.gene_name(matrix.gene(row)))?;
            for value in self.row(row) {
                write!(out, "\t{}", value)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Centre on the mean and scale to unit norm; `None` without variance
fn standardize(row: &[f64]) -> Option<Vec<f64>> {
    if row.len() < 2 {
        return None;
    }
    let mean = row.iter().sum::<f64>() / row.len() as f64;
    let centred: Vec<f64> = row.iter().map(|v| v - mean).collect();
    let norm = dot(&centred, &centred).sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return None;
    }
    Some(centred.into_iter().map(|v| v / norm).collect())
}

fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}
