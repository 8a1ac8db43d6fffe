//! Queries against the outcome of the latest solve attempt.

use crate::types::{BasicSolution, SolutionStatus};
use tracing::debug;

use super::Problem;
use super::error::ProblemError;

fn value_at(values: &[f64], position: usize) -> f64 {
    values.get(position).copied().unwrap_or(0.0)
}

fn check_solution_len(expected: usize, got: usize) -> Result<(), ProblemError> {
    if got != 0 && got != expected {
        return Err(ProblemError::LengthMismatch {
            operation: "record_solution",
            expected,
            got,
        });
    }
    Ok(())
}

impl Problem {
    /// Store the outcome of a solve attempt.
    ///
    /// Each value vector must be empty or sized to the matching row/column count.
    pub fn record_solution(&mut self, solution: BasicSolution) -> Result<(), ProblemError> {
        let data = self.data_mut("record_solution")?;
        check_solution_len(data.columns.len(), solution.column_primal.len())?;
        check_solution_len(data.columns.len(), solution.column_dual.len())?;
        check_solution_len(data.rows.len(), solution.row_primal.len())?;
        check_solution_len(data.rows.len(), solution.row_dual.len())?;
        debug!(
            component = "problem",
            operation = "record_solution",
            status = "success",
            solution_status = solution.status.as_str(),
            primal_status = solution.primal_status.as_str(),
            dual_status = solution.dual_status.as_str(),
            objective_value = solution.objective_value,
            "Recorded solution"
        );
        data.solution = solution;
        Ok(())
    }

    /// The stored solve outcome.
    pub fn basic_solution(&self) -> Result<&BasicSolution, ProblemError> {
        Ok(&self.data("basic_solution")?.solution)
    }

    /// Overall status of the basic solution.
    pub fn status(&self) -> Result<SolutionStatus, ProblemError> {
        Ok(self.data("status")?.solution.status)
    }

    pub fn primal_status(&self) -> Result<SolutionStatus, ProblemError> {
        Ok(self.data("primal_status")?.solution.primal_status)
    }

    pub fn dual_status(&self) -> Result<SolutionStatus, ProblemError> {
        Ok(self.data("dual_status")?.solution.dual_status)
    }

    /// Objective value, meaningful when the status is optimal or feasible.
    pub fn objective_value(&self) -> Result<f64, ProblemError> {
        Ok(self.data("objective_value")?.solution.objective_value)
    }

    /// Primal value of column `column`; 0 before any solve.
    pub fn column_primal(&self, column: usize) -> Result<f64, ProblemError> {
        let data = self.data("column_primal")?;
        let position = data.column_position(column)?;
        Ok(value_at(&data.solution.column_primal, position))
    }

    /// Reduced cost of column `column`.
    pub fn column_dual(&self, column: usize) -> Result<f64, ProblemError> {
        let data = self.data("column_dual")?;
        let position = data.column_position(column)?;
        Ok(value_at(&data.solution.column_dual, position))
    }

    /// Activity of row `row`.
    pub fn row_primal(&self, row: usize) -> Result<f64, ProblemError> {
        let data = self.data("row_primal")?;
        let position = data.row_position(row)?;
        Ok(value_at(&data.solution.row_primal, position))
    }

    /// Shadow price of row `row`.
    pub fn row_dual(&self, row: usize) -> Result<f64, ProblemError> {
        let data = self.data("row_dual")?;
        let position = data.row_position(row)?;
        Ok(value_at(&data.solution.row_dual, position))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::problem::{Problem, ProblemError};
    use crate::types::{BasicSolution, SolutionStatus};

    fn solved_problem() -> Problem {
        let mut problem = Problem::new();
        problem.add_rows(1).unwrap();
        problem.add_columns(2).unwrap();
        problem
            .record_solution(BasicSolution {
                status: SolutionStatus::Optimal,
                primal_status: SolutionStatus::Feasible,
                dual_status: SolutionStatus::Feasible,
                objective_value: 12.5,
                column_primal: vec![1.0, 2.0],
                column_dual: vec![0.0, -1.0],
                row_primal: vec![3.0],
                row_dual: vec![0.5],
                iterations: 2,
            })
            .unwrap();
        problem
    }

    #[test]
    fn test_statuses_undefined_before_solve() {
        let mut problem = Problem::new();
        problem.add_columns(1).unwrap();
        assert_eq!(problem.status().unwrap(), SolutionStatus::Undefined);
        assert_eq!(problem.primal_status().unwrap(), SolutionStatus::Undefined);
        assert_eq!(problem.dual_status().unwrap(), SolutionStatus::Undefined);
        assert_eq!(problem.column_primal(1).unwrap(), 0.0);
    }

    #[test]
    fn test_recorded_values_are_queryable() {
        let problem = solved_problem();
        assert_eq!(problem.objective_value().unwrap(), 12.5);
        assert_eq!(problem.column_primal(2).unwrap(), 2.0);
        assert_eq!(problem.column_dual(2).unwrap(), -1.0);
        assert_eq!(problem.row_primal(1).unwrap(), 3.0);
        assert_eq!(problem.row_dual(1).unwrap(), 0.5);
        assert_eq!(problem.basic_solution().unwrap().iterations, 2);
        assert!(problem.column_primal(3).is_err());
    }

    #[test]
    fn test_structural_change_discards_solution() {
        let mut problem = solved_problem();
        problem.set_row_name(1, "kept").unwrap();
        assert_eq!(problem.status().unwrap(), SolutionStatus::Optimal);

        problem.set_matrix_row(1, &[0, 1], &[0.0, 1.0]).unwrap();
        assert_eq!(problem.status().unwrap(), SolutionStatus::Undefined);
        assert_eq!(problem.column_primal(1).unwrap(), 0.0);
    }

    #[test]
    fn test_record_solution_checks_lengths() {
        let mut problem = Problem::new();
        problem.add_columns(2).unwrap();
        let err = problem
            .record_solution(BasicSolution {
                column_primal: vec![1.0],
                ..BasicSolution::default()
            })
            .unwrap_err();
        assert!(matches!(err, ProblemError::LengthMismatch { expected: 2, got: 1, .. }));
    }
}
