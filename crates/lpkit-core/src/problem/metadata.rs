//! Naming of the problem, its objective, rows and columns.

use super::Problem;
use super::error::ProblemError;

fn stored_name(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_string())
}

impl Problem {
    /// Set the problem name. An empty string removes it.
    pub fn set_name(&mut self, name: &str) -> Result<(), ProblemError> {
        self.data_mut("set_name")?.name = stored_name(name);
        Ok(())
    }

    /// Problem name, or an empty string if none was set.
    pub fn name(&self) -> Result<&str, ProblemError> {
        Ok(self.data("name")?.name.as_deref().unwrap_or(""))
    }

    pub fn set_objective_name(&mut self, name: &str) -> Result<(), ProblemError> {
        self.data_mut("set_objective_name")?.objective_name = stored_name(name);
        Ok(())
    }

    pub fn objective_name(&self) -> Result<&str, ProblemError> {
        Ok(self
            .data("objective_name")?
            .objective_name
            .as_deref()
            .unwrap_or(""))
    }

    pub fn set_row_name(&mut self, index: usize, name: &str) -> Result<(), ProblemError> {
        let data = self.data_mut("set_row_name")?;
        let position = data.row_position(index)?;
        data.rows[position].name = stored_name(name);
        Ok(())
    }

    pub fn row_name(&self, index: usize) -> Result<&str, ProblemError> {
        let data = self.data("row_name")?;
        let position = data.row_position(index)?;
        Ok(data.rows[position].name.as_deref().unwrap_or(""))
    }

    pub fn set_column_name(&mut self, index: usize, name: &str) -> Result<(), ProblemError> {
        let data = self.data_mut("set_column_name")?;
        let position = data.column_position(index)?;
        data.columns[position].name = stored_name(name);
        Ok(())
    }

    pub fn column_name(&self, index: usize) -> Result<&str, ProblemError> {
        let data = self.data("column_name")?;
        let position = data.column_position(index)?;
        Ok(data.columns[position].name.as_deref().unwrap_or(""))
    }

    /// Lookup a row by name, returning its 1-based index.
    pub fn find_row(&self, name: &str) -> Result<Option<usize>, ProblemError> {
        let data = self.data("find_row")?;
        Ok(data
            .rows
            .iter()
            .position(|row| row.name.as_deref() == Some(name))
            .map(|position| position + 1))
    }

    /// Lookup a column by name, returning its 1-based index.
    pub fn find_column(&self, name: &str) -> Result<Option<usize>, ProblemError> {
        let data = self.data("find_column")?;
        Ok(data
            .columns
            .iter()
            .position(|column| column.name.as_deref() == Some(name))
            .map(|position| position + 1))
    }
}
