//! CSC export for handing the matrix to an engine.

use super::Problem;
use super::error::ProblemError;

/// Constraint matrix in compressed sparse column form, 0-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CscMatrix {
    pub num_rows: usize,
    pub num_columns: usize,
    /// `col_starts[j]..col_starts[j + 1]` spans column `j`; length `num_columns + 1`.
    pub col_starts: Vec<usize>,
    pub row_indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl CscMatrix {
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// `(row, value)` pairs of 0-based column `j`.
    ///
    /// Starts past the stored entries are clamped, so an inconsistent
    /// hand-built matrix yields a short or empty column.
    pub fn column(&self, j: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let stored = self.row_indices.len().min(self.values.len());
        let end = self
            .col_starts
            .get(j + 1)
            .copied()
            .unwrap_or(0)
            .min(stored);
        let start = self.col_starts.get(j).copied().unwrap_or(0).min(end);
        self.row_indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }
}

impl Problem {
    /// Export the constraint matrix, rows sorted within each column.
    pub fn to_csc(&self) -> Result<CscMatrix, ProblemError> {
        let data = self.data("to_csc")?;
        let nnz: usize = data.columns.iter().map(|c| c.entries.len()).sum();
        let mut csc = CscMatrix {
            num_rows: data.rows.len(),
            num_columns: data.columns.len(),
            col_starts: Vec::with_capacity(data.columns.len() + 1),
            row_indices: Vec::with_capacity(nnz),
            values: Vec::with_capacity(nnz),
        };
        csc.col_starts.push(0);
        for column in &data.columns {
            let mut entries = column.entries.clone();
            entries.sort_by_key(|&(row, _)| row);
            for (row, value) in entries {
                csc.row_indices.push(row - 1);
                csc.values.push(value);
            }
            csc.col_starts.push(csc.values.len());
        }
        Ok(csc)
    }
}
