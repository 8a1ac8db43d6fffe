//! Model-file translation: read a file with the HiGHS reader, stage the LP,
//! then build it into a [`Problem`].

use std::path::{Path, PathBuf};

use lpkit_core::{Bounds, ObjectiveDirection, Problem, ProblemError};
use tracing::{debug, warn};

use crate::ffi::{EngineHandle, EngineLp};

/// Errors produced while translating a model file.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// The engine reader rejected the file.
    ReadFailed { path: PathBuf, code: i32 },
    /// The loaded LP could not be read back from the engine.
    GenerateFailed { code: i32 },
    /// `generate` was called before a successful `read_model`.
    NotRead,
    /// `build_problem` was called before a successful `generate`.
    NotGenerated,
    /// Model and data live in the same file for every supported format.
    DataFilesUnsupported { path: PathBuf },
    /// The translator was freed.
    Freed { operation: &'static str },
    /// Filling the target problem failed.
    Problem(ProblemError),
}

impl TranslateError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            TranslateError::ReadFailed { .. } => "TRANSLATE_READ_FAILED",
            TranslateError::GenerateFailed { .. } => "TRANSLATE_GENERATE_FAILED",
            TranslateError::NotRead => "TRANSLATE_NOT_READ",
            TranslateError::NotGenerated => "TRANSLATE_NOT_GENERATED",
            TranslateError::DataFilesUnsupported { .. } => "TRANSLATE_DATA_UNSUPPORTED",
            TranslateError::Freed { .. } => "TRANSLATOR_FREED",
            TranslateError::Problem(err) => err.code(),
        }
    }
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::ReadFailed { path, code } => write!(
                f,
                "[{}] failed to read model file {} (status {})",
                self.code(),
                path.display(),
                code
            ),
            TranslateError::GenerateFailed { code } => write!(
                f,
                "[{}] failed to read the loaded model back (status {})",
                self.code(),
                code
            ),
            TranslateError::NotRead => {
                write!(f, "[{}] no model file has been read", self.code())
            }
            TranslateError::NotGenerated => {
                write!(f, "[{}] model has not been generated", self.code())
            }
            TranslateError::DataFilesUnsupported { path } => write!(
                f,
                "[{}] separate data files are not supported: {}",
                self.code(),
                path.display()
            ),
            TranslateError::Freed { operation } => write!(
                f,
                "[{}] translator was freed before {}",
                self.code(),
                operation
            ),
            TranslateError::Problem(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for TranslateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslateError::Problem(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProblemError> for TranslateError {
    fn from(err: ProblemError) -> Self {
        TranslateError::Problem(err)
    }
}

/// Three-step translator from a model file to a [`Problem`].
#[derive(Debug)]
pub struct ModelTranslator {
    handle: EngineHandle,
    source: Option<PathBuf>,
    staged: Option<EngineLp>,
}

impl Default for ModelTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelTranslator {
    pub fn new() -> Self {
        let mut handle = EngineHandle::new();
        handle.set_quiet();
        Self {
            handle,
            source: None,
            staged: None,
        }
    }

    fn ensure_live(&self, operation: &'static str) -> Result<(), TranslateError> {
        if self.handle.is_live() {
            Ok(())
        } else {
            Err(TranslateError::Freed { operation })
        }
    }

    /// Read an MPS or CPLEX LP file into the engine.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::ReadFailed`] if the engine rejects the file.
    pub fn read_model(&mut self, path: impl AsRef<Path>) -> Result<(), TranslateError> {
        self.ensure_live("read_model")?;
        let path = path.as_ref();
        self.source = None;
        self.staged = None;
        if let Err(status) = self.handle.read_model(path) {
            warn!(
                component = "translate",
                operation = "read_model",
                status = "error",
                path = %path.display(),
                status_code = status.0,
                "HiGHS could not read model file"
            );
            return Err(TranslateError::ReadFailed {
                path: path.to_path_buf(),
                code: status.0,
            });
        }
        debug!(
            component = "translate",
            operation = "read_model",
            status = "success",
            path = %path.display(),
            "Read model file"
        );
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    /// Always fails: every supported format carries its data inline.
    pub fn read_data(&mut self, path: impl AsRef<Path>) -> Result<(), TranslateError> {
        self.ensure_live("read_data")?;
        Err(TranslateError::DataFilesUnsupported {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Stage the LP loaded by [`ModelTranslator::read_model`].
    pub fn generate(&mut self) -> Result<(), TranslateError> {
        self.ensure_live("generate")?;
        if self.source.is_none() {
            return Err(TranslateError::NotRead);
        }
        let lp = self
            .handle
            .extract_lp()
            .map_err(|status| TranslateError::GenerateFailed { code: status.0 })?;
        debug!(
            component = "translate",
            operation = "generate",
            status = "success",
            num_rows = lp.row_lower.len(),
            num_columns = lp.costs.len(),
            nnz = lp.values.len(),
            "Generated model"
        );
        self.staged = Some(lp);
        Ok(())
    }

    /// Replace the contents of `problem` with the staged model.
    ///
    /// The objective name is left empty: the HiGHS C API keeps the name it
    /// parsed from the file but has no call to read it back.
    pub fn build_problem(&self, problem: &mut Problem) -> Result<(), TranslateError> {
        self.ensure_live("build_problem")?;
        let lp = self.staged.as_ref().ok_or(TranslateError::NotGenerated)?;

        problem.clear()?;
        if let Some(stem) = self
            .source
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|stem| stem.to_str())
        {
            problem.set_name(stem)?;
        }
        let direction = if lp.maximize {
            ObjectiveDirection::Maximize
        } else {
            ObjectiveDirection::Minimize
        };
        problem.set_objective_direction(direction)?;
        problem.set_objective_constant(lp.offset)?;

        problem.add_rows(lp.row_lower.len())?;
        for (position, (&lower, &upper)) in lp.row_lower.iter().zip(&lp.row_upper).enumerate() {
            let row = position + 1;
            let bounds = Bounds::from_range(lower, upper);
            problem.set_row_bounds(row, bounds.kind, bounds.lower, bounds.upper)?;
            if let Some(name) = lp.row_names.get(position) {
                problem.set_row_name(row, name)?;
            }
        }

        problem.add_columns(lp.costs.len())?;
        for (position, &cost) in lp.costs.iter().enumerate() {
            let column = position + 1;
            let bounds = Bounds::from_range(lp.col_lower[position], lp.col_upper[position]);
            problem.set_column_bounds(column, bounds.kind, bounds.lower, bounds.upper)?;
            problem.set_objective_coefficient(column, cost)?;
            if let Some(name) = lp.col_names.get(position) {
                problem.set_column_name(column, name)?;
            }

            let start = lp.col_starts.get(position).copied().unwrap_or(0);
            let end = lp.col_starts.get(position + 1).copied().unwrap_or(start);
            let mut indices = vec![0];
            let mut values = vec![0.0];
            for entry in start..end {
                indices.push(lp.row_indices[entry] + 1);
                values.push(lp.values[entry]);
            }
            problem.set_matrix_column(column, &indices, &values)?;
        }

        debug!(
            component = "translate",
            operation = "build_problem",
            status = "success",
            num_rows = lp.row_lower.len(),
            num_columns = lp.costs.len(),
            direction = direction.as_str(),
            "Built problem from model file"
        );
        Ok(())
    }

    /// Release the engine instance; later calls fail with `Freed`.
    pub fn free(&mut self) {
        self.handle.free();
        self.source = None;
        self.staged = None;
    }
}

/// Read, generate and build `path` into a new problem.
pub fn translate_file(path: impl AsRef<Path>) -> Result<Problem, TranslateError> {
    let mut translator = ModelTranslator::new();
    translator.read_model(path)?;
    translator.generate()?;
    let mut problem = Problem::new();
    translator.build_problem(&mut problem)?;
    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_out_of_order() {
        let mut translator = ModelTranslator::new();
        assert_eq!(translator.generate(), Err(TranslateError::NotRead));
        let mut problem = Problem::new();
        assert_eq!(
            translator.build_problem(&mut problem),
            Err(TranslateError::NotGenerated)
        );
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let mut translator = ModelTranslator::new();
        let err = translator
            .read_model("/nonexistent/lpkit/model.lp")
            .unwrap_err();
        assert_eq!(err.code(), "TRANSLATE_READ_FAILED");
        assert!(err.to_string().contains("model.lp"));
        assert_eq!(translator.generate(), Err(TranslateError::NotRead));
    }

    #[test]
    fn test_data_files_unsupported() {
        let mut translator = ModelTranslator::new();
        let err = translator.read_data("model.dat").unwrap_err();
        assert_eq!(err.code(), "TRANSLATE_DATA_UNSUPPORTED");
    }

    #[test]
    fn test_free_is_idempotent_and_final() {
        let mut translator = ModelTranslator::new();
        translator.free();
        translator.free();
        assert!(matches!(
            translator.read_model("model.lp"),
            Err(TranslateError::Freed { operation: "read_model" })
        ));
    }
}
