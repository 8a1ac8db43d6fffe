//! Solver error types.

use crate::problem::ProblemError;

/// Reasons a solve attempt produced no result.
///
/// `code()` keeps the classic numbering used by LP engines for these
/// conditions so codes stay stable across bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptError {
    InvalidBasis,
    SingularMatrix,
    IllConditionedMatrix,
    InvalidBounds,
    SolverFailed,
    ObjectiveLowerLimit,
    ObjectiveUpperLimit,
    IterationLimit,
    TimeLimit,
    NoPrimalFeasible,
    NoDualFeasible,
    RootLpOptimumNotProvided,
    SearchTerminated,
    MipGapReached,
    NoPrimalDualFeasible,
    NoConvergence,
    NumericalInstability,
    InvalidData,
    ResultOutOfRange,
}

impl OptError {
    pub const ALL: [OptError; 19] = [
        OptError::InvalidBasis,
        OptError::SingularMatrix,
        OptError::IllConditionedMatrix,
        OptError::InvalidBounds,
        OptError::SolverFailed,
        OptError::ObjectiveLowerLimit,
        OptError::ObjectiveUpperLimit,
        OptError::IterationLimit,
        OptError::TimeLimit,
        OptError::NoPrimalFeasible,
        OptError::NoDualFeasible,
        OptError::RootLpOptimumNotProvided,
        OptError::SearchTerminated,
        OptError::MipGapReached,
        OptError::NoPrimalDualFeasible,
        OptError::NoConvergence,
        OptError::NumericalInstability,
        OptError::InvalidData,
        OptError::ResultOutOfRange,
    ];

    /// Integer code of this error (1 through 19).
    pub fn code(self) -> i32 {
        match self {
            OptError::InvalidBasis => 0x01,
            OptError::SingularMatrix => 0x02,
            OptError::IllConditionedMatrix => 0x03,
            OptError::InvalidBounds => 0x04,
            OptError::SolverFailed => 0x05,
            OptError::ObjectiveLowerLimit => 0x06,
            OptError::ObjectiveUpperLimit => 0x07,
            OptError::IterationLimit => 0x08,
            OptError::TimeLimit => 0x09,
            OptError::NoPrimalFeasible => 0x0A,
            OptError::NoDualFeasible => 0x0B,
            OptError::RootLpOptimumNotProvided => 0x0C,
            OptError::SearchTerminated => 0x0D,
            OptError::MipGapReached => 0x0E,
            OptError::NoPrimalDualFeasible => 0x0F,
            OptError::NoConvergence => 0x10,
            OptError::NumericalInstability => 0x11,
            OptError::InvalidData => 0x12,
            OptError::ResultOutOfRange => 0x13,
        }
    }

    /// Map an integer code back; 0 and unknown codes give `None`.
    pub fn from_code(code: i32) -> Option<OptError> {
        Self::ALL.into_iter().find(|err| err.code() == code)
    }

    /// Short symbolic name, e.g. `EBOUND`.
    pub fn symbol(self) -> &'static str {
        match self {
            OptError::InvalidBasis => "EBADB",
            OptError::SingularMatrix => "ESING",
            OptError::IllConditionedMatrix => "ECOND",
            OptError::InvalidBounds => "EBOUND",
            OptError::SolverFailed => "EFAIL",
            OptError::ObjectiveLowerLimit => "EOBJLL",
            OptError::ObjectiveUpperLimit => "EOBJUL",
            OptError::IterationLimit => "EITLIM",
            OptError::TimeLimit => "ETMLIM",
            OptError::NoPrimalFeasible => "ENOPFS",
            OptError::NoDualFeasible => "ENODFS",
            OptError::RootLpOptimumNotProvided => "EROOT",
            OptError::SearchTerminated => "ESTOP",
            OptError::MipGapReached => "EMIPGAP",
            OptError::NoPrimalDualFeasible => "ENOFEAS",
            OptError::NoConvergence => "ENOCVG",
            OptError::NumericalInstability => "EINSTAB",
            OptError::InvalidData => "EDATA",
            OptError::ResultOutOfRange => "ERANGE",
        }
    }

    fn message(self) -> &'static str {
        match self {
            OptError::InvalidBasis => "invalid basis",
            OptError::SingularMatrix => "singular matrix",
            OptError::IllConditionedMatrix => "ill-conditioned matrix",
            OptError::InvalidBounds => "invalid bounds",
            OptError::SolverFailed => "solver failed",
            OptError::ObjectiveLowerLimit => "objective lower limit reached",
            OptError::ObjectiveUpperLimit => "objective upper limit reached",
            OptError::IterationLimit => "iteration limit exceeded",
            OptError::TimeLimit => "time limit exceeded",
            OptError::NoPrimalFeasible => "no primal feasible solution",
            OptError::NoDualFeasible => "no dual feasible solution",
            OptError::RootLpOptimumNotProvided => "root LP optimum not provided",
            OptError::SearchTerminated => "search terminated by application",
            OptError::MipGapReached => "relative mip gap tolerance reached",
            OptError::NoPrimalDualFeasible => "no primal/dual feasible solution",
            OptError::NoConvergence => "no convergence",
            OptError::NumericalInstability => "numerical instability",
            OptError::InvalidData => "invalid data",
            OptError::ResultOutOfRange => "result out of range",
        }
    }
}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.symbol(), self.message())
    }
}

impl std::error::Error for OptError {}

/// Error returned by a solve call.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The problem handle could not be used.
    Problem(ProblemError),
    /// The engine could not produce a result.
    Optimization(OptError),
}

impl SolveError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolveError::Problem(err) => err.code(),
            SolveError::Optimization(err) => err.symbol(),
        }
    }

    /// The optimization error, if that is what this is.
    pub fn opt_error(&self) -> Option<OptError> {
        match self {
            SolveError::Optimization(err) => Some(*err),
            SolveError::Problem(_) => None,
        }
    }
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::Problem(err) => err.fmt(f),
            SolveError::Optimization(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Problem(err) => Some(err),
            SolveError::Optimization(err) => Some(err),
        }
    }
}

impl From<ProblemError> for SolveError {
    fn from(err: ProblemError) -> Self {
        SolveError::Problem(err)
    }
}

impl From<OptError> for SolveError {
    fn from(err: OptError) -> Self {
        SolveError::Optimization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for (expected, err) in (1..=19).zip(OptError::ALL) {
            assert_eq!(err.code(), expected);
            assert_eq!(OptError::from_code(expected), Some(err));
        }
        assert_eq!(OptError::from_code(0), None);
        assert_eq!(OptError::from_code(0x14), None);
    }

    #[test]
    fn test_error_display() {
        let msg = OptError::InvalidBounds.to_string();
        assert!(msg.contains("EBOUND"));
        assert!(msg.contains("invalid bounds"));
        assert_eq!(
            OptError::NoPrimalDualFeasible.to_string(),
            "[ENOFEAS] no primal/dual feasible solution"
        );
    }

    #[test]
    fn test_solve_error_wraps_both_classes() {
        let err: SolveError = ProblemError::UseAfterFree { operation: "simplex" }.into();
        assert_eq!(err.code(), "PROBLEM_DESTROYED");
        assert_eq!(err.opt_error(), None);

        let err: SolveError = OptError::TimeLimit.into();
        assert_eq!(err.code(), "ETMLIM");
        assert_eq!(err.opt_error(), Some(OptError::TimeLimit));
        assert!(err.to_string().contains("time limit exceeded"));
    }
}
