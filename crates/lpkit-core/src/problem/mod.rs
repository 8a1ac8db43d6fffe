//! Problem handle for building linear programs.
//!
//! A [`Problem`] owns its rows, columns, bounds, names, constraint matrix and
//! the outcome of the latest solve. All row and column addressing is 1-based.
//!
//! # Module Organization
//!
//! - [`error`]: Problem error types
//! - [`builder`]: Adding rows and columns, bounds and the objective
//! - [`metadata`]: Problem, objective, row and column names
//! - [`storage`]: Column-first sparse matrix access
//! - [`solution`]: Stored solve outcome and its queries
//! - [`csc_export`]: Compressed-column export for engine bridges

mod builder;
mod csc_export;
mod error;
mod metadata;
mod solution;
mod storage;

use crate::types::{BasicSolution, Bounds, ObjectiveDirection};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

pub use csc_export::CscMatrix;
pub use error::{Axis, ProblemError};

static LIVE_PROBLEMS: AtomicUsize = AtomicUsize::new(0);

/// Number of problem handles currently holding storage in this process.
pub fn live_problems() -> usize {
    LIVE_PROBLEMS.load(Ordering::SeqCst)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RowData {
    pub(crate) name: Option<String>,
    pub(crate) bounds: Bounds,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnData {
    pub(crate) name: Option<String>,
    pub(crate) bounds: Bounds,
    pub(crate) objective: f64,
    // (1-based row index, coefficient), zeros never stored
    pub(crate) entries: Vec<(usize, f64)>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ProblemData {
    pub(crate) name: Option<String>,
    pub(crate) objective_name: Option<String>,
    pub(crate) direction: Option<ObjectiveDirection>,
    pub(crate) objective_constant: f64,
    pub(crate) rows: Vec<RowData>,
    pub(crate) columns: Vec<ColumnData>,
    pub(crate) solution: BasicSolution,
}

impl ProblemData {
    pub(crate) fn row_position(&self, index: usize) -> Result<usize, ProblemError> {
        check_index(Axis::Row, index, self.rows.len())
    }

    pub(crate) fn column_position(&self, index: usize) -> Result<usize, ProblemError> {
        check_index(Axis::Column, index, self.columns.len())
    }

    pub(crate) fn invalidate_solution(&mut self) {
        if !self.solution.is_undefined() {
            self.solution = BasicSolution::default();
        }
    }
}

fn check_index(axis: Axis, index: usize, count: usize) -> Result<usize, ProblemError> {
    if index == 0 || index > count {
        return Err(ProblemError::IndexOutOfRange { axis, index, count });
    }
    Ok(index - 1)
}

/// An LP problem owned through an explicit handle.
///
/// Storage is released by [`Problem::destroy`] or, as a backstop, when the
/// handle is dropped. Both paths are idempotent. Every other operation on a
/// destroyed handle returns [`ProblemError::UseAfterFree`].
#[derive(Debug)]
pub struct Problem {
    inner: Option<Box<ProblemData>>,
}

impl Problem {
    /// Create an empty problem with no rows, no columns and no direction.
    pub fn new() -> Self {
        Self::from_data(ProblemData::default())
    }

    fn from_data(data: ProblemData) -> Self {
        let live = LIVE_PROBLEMS.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            component = "problem",
            operation = "create",
            status = "success",
            rows = data.rows.len(),
            columns = data.columns.len(),
            live,
            "Created problem"
        );
        Self {
            inner: Some(Box::new(data)),
        }
    }

    /// Release all storage. A second call is a no-op.
    pub fn destroy(&mut self) {
        if self.inner.take().is_some() {
            let live = LIVE_PROBLEMS.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            debug!(
                component = "problem",
                operation = "destroy",
                status = "success",
                live,
                "Destroyed problem"
            );
        }
    }

    /// Whether [`Problem::destroy`] has been called on this handle.
    pub fn is_destroyed(&self) -> bool {
        self.inner.is_none()
    }

    /// Reset to the state of a freshly created problem.
    pub fn clear(&mut self) -> Result<(), ProblemError> {
        let data = self.data_mut("clear")?;
        *data = ProblemData::default();
        debug!(
            component = "problem",
            operation = "clear",
            status = "success",
            "Cleared problem"
        );
        Ok(())
    }

    /// Independent copy of this problem.
    ///
    /// Counts, bounds, matrix, objective and the stored solution are always
    /// copied; names only when `with_names` is true.
    pub fn copy(&self, with_names: bool) -> Result<Problem, ProblemError> {
        let mut data = self.data("copy")?.clone();
        if !with_names {
            data.name = None;
            data.objective_name = None;
            for row in &mut data.rows {
                row.name = None;
            }
            for column in &mut data.columns {
                column.name = None;
            }
        }
        debug!(
            component = "problem",
            operation = "copy",
            status = "success",
            with_names,
            "Copying problem"
        );
        Ok(Self::from_data(data))
    }

    pub(crate) fn data(&self, operation: &'static str) -> Result<&ProblemData, ProblemError> {
        match self.inner.as_deref() {
            Some(data) => Ok(data),
            None => Err(use_after_free(operation)),
        }
    }

    pub(crate) fn data_mut(
        &mut self,
        operation: &'static str,
    ) -> Result<&mut ProblemData, ProblemError> {
        match self.inner.as_deref_mut() {
            Some(data) => Ok(data),
            None => Err(use_after_free(operation)),
        }
    }
}

fn use_after_free(operation: &'static str) -> ProblemError {
    warn!(
        component = "problem",
        operation,
        status = "error",
        "Operation on destroyed problem"
    );
    ProblemError::UseAfterFree { operation }
}

impl Default for Problem {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Problem {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{BoundType, SolutionStatus};

    #[test]
    fn test_new_problem_is_empty() {
        let problem = Problem::new();
        assert_eq!(problem.num_rows().unwrap(), 0);
        assert_eq!(problem.num_columns().unwrap(), 0);
        assert_eq!(problem.objective_direction().unwrap(), None);
        assert_eq!(problem.name().unwrap(), "");
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut problem = Problem::new();
        problem.destroy();
        problem.destroy();
        assert!(problem.is_destroyed());
    }

    #[test]
    fn test_operations_after_destroy_fail() {
        let mut problem = Problem::new();
        problem.destroy();
        assert_eq!(
            problem.add_rows(1),
            Err(ProblemError::UseAfterFree { operation: "add_rows" })
        );
        assert!(matches!(
            problem.clear(),
            Err(ProblemError::UseAfterFree { operation: "clear" })
        ));
        assert!(matches!(
            problem.copy(true),
            Err(ProblemError::UseAfterFree { .. })
        ));
        assert!(problem.name().is_err());
        assert!(problem.matrix_row(1).is_err());
        assert!(problem.status().is_err());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut problem = Problem::new();
        problem.set_name("before").unwrap();
        problem.add_rows(3).unwrap();
        problem.add_columns(2).unwrap();
        problem
            .set_objective_direction(ObjectiveDirection::Maximize)
            .unwrap();

        problem.clear().unwrap();

        assert_eq!(problem.name().unwrap(), "");
        assert_eq!(problem.num_rows().unwrap(), 0);
        assert_eq!(problem.num_columns().unwrap(), 0);
        assert_eq!(problem.objective_direction().unwrap(), None);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = Problem::new();
        original.add_rows(1).unwrap();
        original.add_columns(1).unwrap();
        original
            .set_column_bounds(1, BoundType::Lower, 0.0, 0.0)
            .unwrap();

        let mut copy = original.copy(true).unwrap();
        copy.set_column_bounds(1, BoundType::Fixed, 3.0, 3.0).unwrap();
        copy.add_rows(2).unwrap();

        assert_eq!(original.num_rows().unwrap(), 1);
        assert_eq!(
            original.column_bounds(1).unwrap().kind,
            BoundType::Lower
        );
        assert_eq!(copy.num_rows().unwrap(), 3);
    }

    #[test]
    fn test_copy_carries_solution() {
        let mut original = Problem::new();
        original.add_columns(1).unwrap();
        original
            .record_solution(BasicSolution {
                status: SolutionStatus::Optimal,
                primal_status: SolutionStatus::Feasible,
                dual_status: SolutionStatus::Feasible,
                objective_value: 4.0,
                column_primal: vec![2.0],
                ..BasicSolution::default()
            })
            .unwrap();

        let copy = original.copy(false).unwrap();
        assert_eq!(copy.status().unwrap(), SolutionStatus::Optimal);
        assert_eq!(copy.column_primal(1).unwrap(), 2.0);
    }
}
