//! Column-first sparse storage of the constraint matrix.
//!
//! Index/value sequences exchanged here follow the 1-based convention: slot 0
//! of every sequence is reserved and ignored, entries live at `1..len`.

use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

use super::error::{Axis, ProblemError};
use super::{Problem, ProblemData};

fn check_lengths(
    operation: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), ProblemError> {
    if expected != got {
        warn!(
            component = "problem",
            operation,
            status = "error",
            expected,
            got,
            "Index/value length mismatch"
        );
        return Err(ProblemError::LengthMismatch {
            operation,
            expected,
            got,
        });
    }
    Ok(())
}

/// Validate the entries of one row (`axis == Column`) or one column
/// (`axis == Row`) and drop explicit zeros.
fn collect_entries(
    axis: Axis,
    owner: usize,
    count: usize,
    indices: &[usize],
    values: &[f64],
) -> Result<Vec<(usize, f64)>, ProblemError> {
    let mut seen = vec![false; count + 1];
    let mut entries = Vec::with_capacity(indices.len().saturating_sub(1));
    for (&index, &value) in indices.iter().zip(values).skip(1) {
        if index == 0 || index > count {
            return Err(ProblemError::IndexOutOfRange { axis, index, count });
        }
        if seen[index] {
            warn!(
                component = "problem",
                operation = "set_matrix",
                status = "error",
                axis = axis.as_str(),
                owner,
                index,
                "Duplicate index"
            );
            return Err(ProblemError::DuplicateIndex { axis, owner, index });
        }
        seen[index] = true;
        if value != 0.0 {
            entries.push((index, value));
        }
    }
    Ok(entries)
}

fn with_reserved_slot(entries: impl Iterator<Item = (usize, f64)>) -> (Vec<usize>, Vec<f64>) {
    let mut indices = vec![0];
    let mut values = vec![0.0];
    for (index, value) in entries {
        indices.push(index);
        values.push(value);
    }
    (indices, values)
}

impl ProblemData {
    fn row_iter(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter_map(move |(position, column)| {
                column
                    .entries
                    .iter()
                    .find(|(r, _)| *r == row)
                    .map(|&(_, value)| (position + 1, value))
            })
    }
}

impl Problem {
    /// Replace all entries of row `row`.
    ///
    /// `columns[k]` and `values[k]` for `k >= 1` give the new entries.
    pub fn set_matrix_row(
        &mut self,
        row: usize,
        columns: &[usize],
        values: &[f64],
    ) -> Result<(), ProblemError> {
        let data = self.data_mut("set_matrix_row")?;
        data.row_position(row)?;
        check_lengths("set_matrix_row", columns.len(), values.len())?;
        let entries = collect_entries(Axis::Column, row, data.columns.len(), columns, values)?;

        for column in &mut data.columns {
            column.entries.retain(|(r, _)| *r != row);
        }
        for &(column, value) in &entries {
            data.columns[column - 1].entries.push((row, value));
        }
        data.invalidate_solution();
        trace!(
            component = "problem",
            operation = "set_matrix_row",
            status = "success",
            row,
            nnz = entries.len(),
            "Replaced matrix row"
        );
        Ok(())
    }

    /// Replace all entries of column `column`.
    pub fn set_matrix_column(
        &mut self,
        column: usize,
        rows: &[usize],
        values: &[f64],
    ) -> Result<(), ProblemError> {
        let data = self.data_mut("set_matrix_column")?;
        let position = data.column_position(column)?;
        check_lengths("set_matrix_column", rows.len(), values.len())?;
        let entries = collect_entries(Axis::Row, column, data.rows.len(), rows, values)?;

        let nnz = entries.len();
        data.columns[position].entries = entries;
        data.invalidate_solution();
        trace!(
            component = "problem",
            operation = "set_matrix_column",
            status = "success",
            column,
            nnz,
            "Replaced matrix column"
        );
        Ok(())
    }

    /// Replace the whole constraint matrix.
    ///
    /// Entry `k >= 1` is `(rows[k], columns[k]) = values[k]`. The matrix is left
    /// untouched when any entry is rejected.
    pub fn load_matrix(
        &mut self,
        rows: &[usize],
        columns: &[usize],
        values: &[f64],
    ) -> Result<(), ProblemError> {
        let data = self.data_mut("load_matrix")?;
        check_lengths("load_matrix", rows.len(), columns.len())?;
        check_lengths("load_matrix", rows.len(), values.len())?;

        let num_rows = data.rows.len();
        let num_columns = data.columns.len();
        let mut seen = BTreeSet::new();
        for (&row, &column) in rows.iter().zip(columns).skip(1) {
            if row == 0 || row > num_rows {
                return Err(ProblemError::IndexOutOfRange {
                    axis: Axis::Row,
                    index: row,
                    count: num_rows,
                });
            }
            if column == 0 || column > num_columns {
                return Err(ProblemError::IndexOutOfRange {
                    axis: Axis::Column,
                    index: column,
                    count: num_columns,
                });
            }
            if !seen.insert((row, column)) {
                return Err(ProblemError::DuplicateIndex {
                    axis: Axis::Column,
                    owner: row,
                    index: column,
                });
            }
        }

        for column in &mut data.columns {
            column.entries.clear();
        }
        let mut nnz = 0usize;
        for ((&row, &column), &value) in rows.iter().zip(columns).zip(values).skip(1) {
            if value != 0.0 {
                data.columns[column - 1].entries.push((row, value));
                nnz += 1;
            }
        }
        data.invalidate_solution();
        debug!(
            component = "problem",
            operation = "load_matrix",
            status = "success",
            nnz,
            num_rows,
            num_columns,
            "Loaded constraint matrix"
        );
        Ok(())
    }

    /// Entries of row `row` as `(columns, values)` with the reserved slot 0.
    pub fn matrix_row(&self, row: usize) -> Result<(Vec<usize>, Vec<f64>), ProblemError> {
        let data = self.data("matrix_row")?;
        data.row_position(row)?;
        Ok(with_reserved_slot(data.row_iter(row)))
    }

    /// Entries of column `column` as `(rows, values)` with the reserved slot 0.
    pub fn matrix_column(&self, column: usize) -> Result<(Vec<usize>, Vec<f64>), ProblemError> {
        let data = self.data("matrix_column")?;
        let position = data.column_position(column)?;
        Ok(with_reserved_slot(
            data.columns[position].entries.iter().copied(),
        ))
    }

    /// Entries of row `row` as `(column, value)` pairs.
    pub fn row_entries(&self, row: usize) -> Result<Vec<(usize, f64)>, ProblemError> {
        let data = self.data("row_entries")?;
        data.row_position(row)?;
        Ok(data.row_iter(row).collect())
    }

    /// Entries of column `column` as `(row, value)` pairs.
    pub fn column_entries(&self, column: usize) -> Result<Vec<(usize, f64)>, ProblemError> {
        let data = self.data("column_entries")?;
        let position = data.column_position(column)?;
        Ok(data.columns[position].entries.clone())
    }

    /// Get the number of stored nonzero coefficients.
    pub fn num_nonzeros(&self) -> Result<usize, ProblemError> {
        Ok(self
            .data("num_nonzeros")?
            .columns
            .iter()
            .map(|column| column.entries.len())
            .sum())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::problem::{Axis, Problem, ProblemError};
    use std::collections::BTreeMap;

    fn as_map(indices: &[usize], values: &[f64]) -> BTreeMap<usize, f64> {
        indices
            .iter()
            .copied()
            .zip(values.iter().copied())
            .skip(1)
            .collect()
    }

    #[test]
    fn test_set_get_matrix_row() {
        let mut problem = Problem::new();
        problem.add_rows(1).unwrap();
        problem.add_columns(10).unwrap();
        let columns = [0, 3, 7, 5, 2];
        let values = [9.0, 7.5, 11.0, 5.0, 12.0];
        problem.set_matrix_row(1, &columns, &values).unwrap();

        let (got_columns, got_values) = problem.matrix_row(1).unwrap();
        assert_eq!(got_columns.len(), got_values.len());
        assert_eq!(got_columns[0], 0);
        assert_eq!(as_map(&got_columns, &got_values), as_map(&columns, &values));
        assert_eq!(problem.num_nonzeros().unwrap(), 4);
    }

    #[test]
    fn test_set_get_matrix_column() {
        let mut problem = Problem::new();
        problem.add_rows(10).unwrap();
        problem.add_columns(1).unwrap();
        let rows = [0, 3, 7, 5, 2];
        let values = [9.0, 7.5, 11.0, 5.0, 12.0];
        problem.set_matrix_column(1, &rows, &values).unwrap();

        let (got_rows, got_values) = problem.matrix_column(1).unwrap();
        assert_eq!(as_map(&got_rows, &got_values), as_map(&rows, &values));
        assert_eq!(problem.row_entries(7).unwrap(), vec![(1, 11.0)]);
    }

    #[test]
    fn test_set_matrix_row_replaces_previous() {
        let mut problem = Problem::new();
        problem.add_rows(2).unwrap();
        problem.add_columns(3).unwrap();
        problem.set_matrix_row(1, &[0, 1, 2], &[0.0, 1.0, 2.0]).unwrap();
        problem.set_matrix_row(2, &[0, 1], &[0.0, 5.0]).unwrap();
        problem.set_matrix_row(1, &[0, 3], &[0.0, 4.0]).unwrap();

        assert_eq!(problem.row_entries(1).unwrap(), vec![(3, 4.0)]);
        assert_eq!(problem.row_entries(2).unwrap(), vec![(1, 5.0)]);
        assert_eq!(problem.column_entries(1).unwrap(), vec![(2, 5.0)]);
    }

    #[test]
    fn test_slot_zero_is_ignored() {
        let mut problem = Problem::new();
        problem.add_rows(1).unwrap();
        problem.add_columns(2).unwrap();
        problem
            .set_matrix_row(1, &[99, 2], &[f64::NAN, 3.0])
            .unwrap();
        assert_eq!(problem.row_entries(1).unwrap(), vec![(2, 3.0)]);

        problem.set_matrix_row(1, &[], &[]).unwrap();
        assert!(problem.row_entries(1).unwrap().is_empty());
    }

    #[test]
    fn test_zero_coefficients_not_stored() {
        let mut problem = Problem::new();
        problem.add_rows(1).unwrap();
        problem.add_columns(2).unwrap();
        problem
            .set_matrix_row(1, &[0, 1, 2], &[0.0, 0.0, 1.0])
            .unwrap();
        assert_eq!(problem.num_nonzeros().unwrap(), 1);
    }

    #[test]
    fn test_length_mismatch() {
        let mut problem = Problem::new();
        problem.add_rows(1).unwrap();
        problem.add_columns(2).unwrap();
        assert_eq!(
            problem.set_matrix_row(1, &[0, 1, 2], &[0.0, 1.0]),
            Err(ProblemError::LengthMismatch {
                operation: "set_matrix_row",
                expected: 3,
                got: 2
            })
        );
        assert!(matches!(
            problem.load_matrix(&[0, 1], &[0, 1], &[0.0]),
            Err(ProblemError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_matrix_index_out_of_range() {
        let mut problem = Problem::new();
        problem.add_rows(2).unwrap();
        problem.add_columns(2).unwrap();
        assert_eq!(
            problem.set_matrix_row(1, &[0, 3], &[0.0, 1.0]),
            Err(ProblemError::IndexOutOfRange {
                axis: Axis::Column,
                index: 3,
                count: 2
            })
        );
        assert!(matches!(
            problem.set_matrix_column(1, &[0, 0], &[0.0, 1.0]),
            Err(ProblemError::IndexOutOfRange { axis: Axis::Row, .. })
        ));
        assert!(problem.matrix_row(3).is_err());
    }

    #[test]
    fn test_duplicates_rejected_without_change() {
        let mut problem = Problem::new();
        problem.add_rows(2).unwrap();
        problem.add_columns(2).unwrap();
        problem.set_matrix_row(1, &[0, 1], &[0.0, 1.0]).unwrap();

        assert_eq!(
            problem.set_matrix_row(1, &[0, 2, 2], &[0.0, 1.0, 2.0]),
            Err(ProblemError::DuplicateIndex {
                axis: Axis::Column,
                owner: 1,
                index: 2
            })
        );
        assert_eq!(
            problem.load_matrix(&[0, 2, 2], &[0, 1, 1], &[0.0, 1.0, 1.0]),
            Err(ProblemError::DuplicateIndex {
                axis: Axis::Column,
                owner: 2,
                index: 1
            })
        );
        assert_eq!(problem.row_entries(1).unwrap(), vec![(1, 1.0)]);
    }

    #[test]
    fn test_load_matrix_recovers_rows() {
        let mut problem = Problem::new();
        problem.add_rows(2).unwrap();
        problem.add_columns(20).unwrap();
        let rows = [0, 1, 1, 1, 1, 2, 2, 2, 2];
        let columns = [0, 1, 5, 9, 17, 2, 3, 5, 20];
        let values = [0.0, 1.0, 2.5, -3.0, 4.0, 6.0, 7.0, 8.0, 9.0];
        problem.load_matrix(&rows, &columns, &values).unwrap();

        let (row1, values1) = problem.matrix_row(1).unwrap();
        let expected1: BTreeMap<usize, f64> =
            [(1, 1.0), (5, 2.5), (9, -3.0), (17, 4.0)].into_iter().collect();
        assert_eq!(as_map(&row1, &values1), expected1);

        let (row2, values2) = problem.matrix_row(2).unwrap();
        let expected2: BTreeMap<usize, f64> =
            [(2, 6.0), (3, 7.0), (5, 8.0), (20, 9.0)].into_iter().collect();
        assert_eq!(as_map(&row2, &values2), expected2);

        let (column5, values5) = problem.matrix_column(5).unwrap();
        let expected5: BTreeMap<usize, f64> = [(1, 2.5), (2, 8.0)].into_iter().collect();
        assert_eq!(as_map(&column5, &values5), expected5);
    }
}
