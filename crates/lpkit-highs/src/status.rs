//! Mapping of HiGHS outcomes onto solution statuses and optimization errors.

use highs::HighsModelStatus;
use lpkit_core::{ObjectiveDirection, OptError, SolutionStatus};

/// What a finished engine run means for the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StatusMapping {
    pub(crate) status: SolutionStatus,
    pub(crate) primal_status: SolutionStatus,
    pub(crate) dual_status: SolutionStatus,
    pub(crate) error: Option<OptError>,
    /// Whether the engine's primal and dual values should be stored.
    pub(crate) keep_values: bool,
}

/// Decode a HiGHS `primal_solution_status` / `dual_solution_status` value.
pub(crate) fn info_status(value: Option<i64>) -> SolutionStatus {
    match value {
        Some(1) => SolutionStatus::Infeasible,
        Some(2) => SolutionStatus::Feasible,
        _ => SolutionStatus::Undefined,
    }
}

pub(crate) fn is_engine_failure(status: HighsModelStatus) -> bool {
    !matches!(
        status,
        HighsModelStatus::Optimal
            | HighsModelStatus::ModelEmpty
            | HighsModelStatus::Infeasible
            | HighsModelStatus::Unbounded
            | HighsModelStatus::UnboundedOrInfeasible
            | HighsModelStatus::ReachedTimeLimit
            | HighsModelStatus::ReachedIterationLimit
            | HighsModelStatus::ObjectiveBound
            | HighsModelStatus::ObjectiveTarget
    )
}

fn undefined(error: OptError) -> StatusMapping {
    StatusMapping {
        status: SolutionStatus::Undefined,
        primal_status: SolutionStatus::Undefined,
        dual_status: SolutionStatus::Undefined,
        error: Some(error),
        keep_values: false,
    }
}

fn interrupted(primal: SolutionStatus, dual: SolutionStatus, error: OptError) -> StatusMapping {
    StatusMapping {
        status: primal,
        primal_status: primal,
        dual_status: dual,
        error: Some(error),
        keep_values: true,
    }
}

pub(crate) fn map_status(
    model_status: HighsModelStatus,
    primal_info: Option<i64>,
    dual_info: Option<i64>,
    direction: ObjectiveDirection,
    presolve: bool,
) -> StatusMapping {
    let primal = info_status(primal_info);
    let dual = info_status(dual_info);
    match model_status {
        HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty => StatusMapping {
            status: SolutionStatus::Optimal,
            primal_status: SolutionStatus::Feasible,
            dual_status: SolutionStatus::Feasible,
            error: None,
            keep_values: true,
        },
        HighsModelStatus::Infeasible => StatusMapping {
            status: SolutionStatus::NoFeasible,
            primal_status: SolutionStatus::NoFeasible,
            dual_status: dual,
            error: presolve.then_some(OptError::NoPrimalFeasible),
            keep_values: true,
        },
        HighsModelStatus::Unbounded => StatusMapping {
            status: SolutionStatus::Unbounded,
            primal_status: primal,
            dual_status: SolutionStatus::NoFeasible,
            error: presolve.then_some(OptError::NoDualFeasible),
            keep_values: true,
        },
        HighsModelStatus::UnboundedOrInfeasible => undefined(OptError::NoPrimalDualFeasible),
        HighsModelStatus::ReachedTimeLimit => interrupted(primal, dual, OptError::TimeLimit),
        HighsModelStatus::ReachedIterationLimit => {
            interrupted(primal, dual, OptError::IterationLimit)
        }
        HighsModelStatus::ObjectiveBound => {
            let error = match direction {
                ObjectiveDirection::Minimize => OptError::ObjectiveUpperLimit,
                ObjectiveDirection::Maximize => OptError::ObjectiveLowerLimit,
            };
            interrupted(primal, dual, error)
        }
        HighsModelStatus::ObjectiveTarget => {
            let error = match direction {
                ObjectiveDirection::Minimize => OptError::ObjectiveLowerLimit,
                ObjectiveDirection::Maximize => OptError::ObjectiveUpperLimit,
            };
            interrupted(primal, dual, error)
        }
        _ => undefined(OptError::SolverFailed),
    }
}

pub(crate) fn model_status_string(status: HighsModelStatus) -> &'static str {
    match status {
        HighsModelStatus::Optimal => "optimal",
        HighsModelStatus::ModelEmpty => "model_empty",
        HighsModelStatus::Infeasible => "infeasible",
        HighsModelStatus::Unbounded => "unbounded",
        HighsModelStatus::UnboundedOrInfeasible => "unbounded_or_infeasible",
        HighsModelStatus::ReachedTimeLimit => "time_limit",
        HighsModelStatus::ReachedIterationLimit => "iteration_limit",
        HighsModelStatus::ObjectiveBound => "objective_bound",
        HighsModelStatus::ObjectiveTarget => "objective_target",
        HighsModelStatus::LoadError => "load_error",
        HighsModelStatus::ModelError => "model_error",
        _ => "unknown",
    }
}
