//! lpkit core: LP problem handles, sparse matrix storage and simplex parameters.
//!
//! Solving is delegated to an engine bridge such as `lpkit-highs`.

pub mod error;
pub mod params;
pub mod problem;
pub mod types;

pub use error::{OptError, SolveError};
pub use params::{MessageLevel, Pricing, RatioTest, SimplexMethod, SimplexParams};
pub use problem::{Axis, CscMatrix, Problem, ProblemError, live_problems};
pub use types::{
    BasicSolution, BoundType, Bounds, INFINITE_BOUND, ObjectiveDirection, SolutionStatus,
};
