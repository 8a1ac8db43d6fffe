//! HiGHS bridge for lpkit problems.
//!
//! Provides the simplex and exact solve entry points, the mapping of engine
//! outcomes onto [`lpkit_core::SolutionStatus`] and [`lpkit_core::OptError`],
//! and translation of MPS / CPLEX LP files into problems.

pub mod diagnostics;
pub mod ffi;
pub mod options;
pub mod solver;
mod status;
pub mod translate;

pub use diagnostics::{EngineInfo, MemoryError, MemorySnapshot, engine_info};
pub use ffi::highs_version;
pub use options::{HighsOption, SolveMode};
pub use solver::{ProblemSolveExt, exact, simplex};
pub use translate::{ModelTranslator, TranslateError, translate_file};
