//! Methods for growing the problem and setting bounds and the objective.

use crate::types::{BoundType, Bounds, ObjectiveDirection};
use tracing::{debug, trace};

use super::error::ProblemError;
use super::{ColumnData, Problem, RowData};

impl Problem {
    /// Append `count` unnamed free rows.
    ///
    /// Returns the 1-based index of the first new row.
    pub fn add_rows(&mut self, count: usize) -> Result<usize, ProblemError> {
        let data = self.data_mut("add_rows")?;
        let first = data.rows.len() + 1;
        data.rows.resize_with(data.rows.len() + count, RowData::default);
        if count > 0 {
            data.invalidate_solution();
        }
        debug!(
            component = "problem",
            operation = "add_rows",
            status = "success",
            count,
            first,
            num_rows = data.rows.len(),
            "Added rows"
        );
        Ok(first)
    }

    /// Append `count` unnamed free columns with a zero objective coefficient.
    ///
    /// Returns the 1-based index of the first new column.
    pub fn add_columns(&mut self, count: usize) -> Result<usize, ProblemError> {
        let data = self.data_mut("add_columns")?;
        let first = data.columns.len() + 1;
        data.columns
            .resize_with(data.columns.len() + count, ColumnData::default);
        if count > 0 {
            data.invalidate_solution();
        }
        debug!(
            component = "problem",
            operation = "add_columns",
            status = "success",
            count,
            first,
            num_columns = data.columns.len(),
            "Added columns"
        );
        Ok(first)
    }

    /// Get the number of rows
    pub fn num_rows(&self) -> Result<usize, ProblemError> {
        Ok(self.data("num_rows")?.rows.len())
    }

    /// Get the number of columns
    pub fn num_columns(&self) -> Result<usize, ProblemError> {
        Ok(self.data("num_columns")?.columns.len())
    }

    /// Set the bound tag and limits of row `index`.
    ///
    /// Limits are stored as given; consistency is checked when solving.
    pub fn set_row_bounds(
        &mut self,
        index: usize,
        kind: BoundType,
        lower: f64,
        upper: f64,
    ) -> Result<(), ProblemError> {
        let data = self.data_mut("set_row_bounds")?;
        let position = data.row_position(index)?;
        data.rows[position].bounds = Bounds::new(kind, lower, upper);
        trace!(
            component = "problem",
            operation = "set_row_bounds",
            status = "success",
            index,
            kind = kind.as_str(),
            lower,
            upper,
            "Set row bounds"
        );
        Ok(())
    }

    /// Set the bound tag and limits of column `index`.
    pub fn set_column_bounds(
        &mut self,
        index: usize,
        kind: BoundType,
        lower: f64,
        upper: f64,
    ) -> Result<(), ProblemError> {
        let data = self.data_mut("set_column_bounds")?;
        let position = data.column_position(index)?;
        data.columns[position].bounds = Bounds::new(kind, lower, upper);
        trace!(
            component = "problem",
            operation = "set_column_bounds",
            status = "success",
            index,
            kind = kind.as_str(),
            lower,
            upper,
            "Set column bounds"
        );
        Ok(())
    }

    pub fn row_bounds(&self, index: usize) -> Result<Bounds, ProblemError> {
        let data = self.data("row_bounds")?;
        Ok(data.rows[data.row_position(index)?].bounds)
    }

    pub fn column_bounds(&self, index: usize) -> Result<Bounds, ProblemError> {
        let data = self.data("column_bounds")?;
        Ok(data.columns[data.column_position(index)?].bounds)
    }

    /// Set the objective direction
    pub fn set_objective_direction(
        &mut self,
        direction: ObjectiveDirection,
    ) -> Result<(), ProblemError> {
        let data = self.data_mut("set_objective_direction")?;
        data.direction = Some(direction);
        debug!(
            component = "problem",
            operation = "set_objective_direction",
            status = "success",
            direction = direction.as_str(),
            "Setting objective direction"
        );
        Ok(())
    }

    /// Objective direction, `None` until one has been set.
    pub fn objective_direction(&self) -> Result<Option<ObjectiveDirection>, ProblemError> {
        Ok(self.data("objective_direction")?.direction)
    }

    pub fn set_objective_coefficient(
        &mut self,
        column: usize,
        value: f64,
    ) -> Result<(), ProblemError> {
        let data = self.data_mut("set_objective_coefficient")?;
        let position = data.column_position(column)?;
        data.columns[position].objective = value;
        Ok(())
    }

    pub fn objective_coefficient(&self, column: usize) -> Result<f64, ProblemError> {
        let data = self.data("objective_coefficient")?;
        Ok(data.columns[data.column_position(column)?].objective)
    }

    /// Set the constant term of the objective.
    pub fn set_objective_constant(&mut self, value: f64) -> Result<(), ProblemError> {
        self.data_mut("set_objective_constant")?.objective_constant = value;
        Ok(())
    }

    pub fn objective_constant(&self) -> Result<f64, ProblemError> {
        Ok(self.data("objective_constant")?.objective_constant)
    }
}
