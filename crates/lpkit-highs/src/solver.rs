//! Simplex and exact solves of a [`Problem`] through HiGHS.
//!
//! Each call builds a fresh column-wise HiGHS problem from the handle, runs
//! one attempt (two for the dual-then-primal method), and stores the mapped
//! outcome back on the handle with [`Problem::record_solution`].

use std::time::Instant;

use highs::{ColProblem, HighsModelStatus, Row, Sense, SolvedModel};
use lpkit_core::{
    BasicSolution, BoundType, ObjectiveDirection, OptError, Problem, ProblemError, SimplexMethod,
    SimplexParams, SolveError,
};
use tracing::{debug, trace, warn};

use crate::diagnostics::{capture_rss, rss_delta};
use crate::ffi::{highs_version, int_info};
use crate::options::{SolveMode, apply, engine_options, presolve_enabled};
use crate::status::{is_engine_failure, map_status, model_status_string};

/// Solve `problem` with the simplex method.
///
/// `Ok(())` means the engine finished its attempt; query
/// [`Problem::status`] for what it found.
///
/// # Errors
///
/// Returns [`SolveError::Optimization`] when the engine could not produce a
/// result and [`SolveError::Problem`] when the handle was destroyed.
pub fn simplex(problem: &mut Problem, params: Option<&SimplexParams>) -> Result<(), SolveError> {
    solve(problem, params, SolveMode::Simplex)
}

/// Solve `problem` with the engine's strictest numerical settings.
///
/// Only the message level and the iteration and time limits of `params`
/// are honored.
///
/// # Errors
///
/// Same as [`simplex`].
pub fn exact(problem: &mut Problem, params: Option<&SimplexParams>) -> Result<(), SolveError> {
    solve(problem, params, SolveMode::Exact)
}

/// Method-call form of [`simplex`] and [`exact`].
pub trait ProblemSolveExt {
    fn simplex(&mut self, params: Option<&SimplexParams>) -> Result<(), SolveError>;
    fn exact(&mut self, params: Option<&SimplexParams>) -> Result<(), SolveError>;
}

impl ProblemSolveExt for Problem {
    fn simplex(&mut self, params: Option<&SimplexParams>) -> Result<(), SolveError> {
        crate::solver::simplex(self, params)
    }

    fn exact(&mut self, params: Option<&SimplexParams>) -> Result<(), SolveError> {
        crate::solver::exact(self, params)
    }
}

/// Column-wise engine input built from a problem handle.
struct EngineInput {
    problem: ColProblem,
    direction: ObjectiveDirection,
    objective_constant: f64,
    num_rows: usize,
    num_columns: usize,
}

fn check_bounds(problem: &Problem) -> Result<(), SolveError> {
    let rows = (1..=problem.num_rows()?).map(|row| (row, "row", problem.row_bounds(row)));
    let columns =
        (1..=problem.num_columns()?).map(|column| (column, "column", problem.column_bounds(column)));
    for (index, axis, bounds) in rows.chain(columns) {
        let bounds = bounds?;
        if bounds.kind == BoundType::Double && bounds.lower >= bounds.upper {
            warn!(
                component = "solver",
                operation = "check_bounds",
                status = "error",
                axis,
                index,
                lower = bounds.lower,
                upper = bounds.upper,
                "Double-bounded entry has lower >= upper"
            );
            return Err(OptError::InvalidBounds.into());
        }
    }
    Ok(())
}

fn build_input(problem: &Problem) -> Result<EngineInput, ProblemError> {
    let build_started = Instant::now();
    let csc = problem.to_csc()?;
    let mut col_problem = ColProblem::default();

    let mut rows: Vec<Row> = Vec::with_capacity(csc.num_rows);
    for row in 1..=csc.num_rows {
        let (lower, upper) = problem.row_bounds(row)?.range();
        rows.push(col_problem.add_row(lower..=upper));
    }

    for position in 0..csc.num_columns {
        let column = position + 1;
        let (lower, upper) = problem.column_bounds(column)?.range();
        let cost = problem.objective_coefficient(column)?;
        let factors: Vec<(Row, f64)> = csc
            .column(position)
            .filter_map(|(row, value)| rows.get(row).map(|&handle| (handle, value)))
            .collect();
        trace!(
            component = "solver",
            operation = "add_column",
            status = "success",
            column,
            lower,
            upper,
            cost,
            num_coeffs = factors.len(),
            "Added column to HiGHS problem"
        );
        col_problem.add_column(cost, lower..=upper, factors);
    }

    let direction = problem
        .objective_direction()?
        .unwrap_or(ObjectiveDirection::Minimize);
    debug!(
        component = "solver",
        operation = "build_problem",
        status = "success",
        num_rows = csc.num_rows,
        num_columns = csc.num_columns,
        nnz = csc.nnz(),
        direction = direction.as_str(),
        duration_ms = build_started.elapsed().as_secs_f64() * 1000.0,
        "Built HiGHS problem"
    );

    Ok(EngineInput {
        problem: col_problem,
        direction,
        objective_constant: problem.objective_constant()?,
        num_rows: csc.num_rows,
        num_columns: csc.num_columns,
    })
}

fn run_attempt(
    problem: ColProblem,
    direction: ObjectiveDirection,
    mode: SolveMode,
    params: &SimplexParams,
    method: SimplexMethod,
) -> Result<SolvedModel, OptError> {
    let sense = match direction {
        ObjectiveDirection::Minimize => Sense::Minimise,
        ObjectiveDirection::Maximize => Sense::Maximise,
    };
    let mut model = problem.try_optimise(sense).map_err(|status| {
        warn!(
            component = "solver",
            operation = "load_problem",
            status = "error",
            highs_status = ?status,
            "HiGHS rejected the problem data"
        );
        OptError::InvalidData
    })?;
    let options = engine_options(mode, params, method);
    apply(&mut model, &options);
    trace!(
        component = "solver",
        operation = "apply_options",
        status = "success",
        num_options = options.len(),
        method = method.as_str(),
        "Applied HiGHS options"
    );
    model.try_solve().map_err(|status| {
        warn!(
            component = "solver",
            operation = "solve",
            status = "error",
            highs_status = ?status,
            method = method.as_str(),
            "HiGHS run failed"
        );
        OptError::SolverFailed
    })
}

/// Whether a dual attempt with this outcome is repeated with primal simplex.
///
/// Only engine failures qualify; rejected input fails the same way twice.
fn should_retry_with_primal(outcome: Result<HighsModelStatus, OptError>) -> bool {
    match outcome {
        Ok(status) => is_engine_failure(status),
        Err(err) => err == OptError::SolverFailed,
    }
}

/// Copy `values` into a vector of exactly `len` entries.
fn sized(values: &[f64], len: usize) -> Vec<f64> {
    let mut out = values.to_vec();
    out.resize(len, 0.0);
    out
}

fn solve(
    problem: &mut Problem,
    params: Option<&SimplexParams>,
    mode: SolveMode,
) -> Result<(), SolveError> {
    let defaults = SimplexParams::default();
    let params = params.unwrap_or(&defaults);
    check_bounds(problem)?;
    let input = build_input(problem)?;

    let solver_version = highs_version().unwrap_or_else(|| "unknown".to_string());
    let rss_before = capture_rss("solve_start");
    let solve_started = Instant::now();
    debug!(
        component = "solver",
        operation = "solve",
        status = "start",
        solver = "highs",
        solver_version = %solver_version,
        mode = mode.as_str(),
        method = params.method.as_str(),
        pricing = params.pricing.as_str(),
        message_level = params.message_level.as_str(),
        rss_bytes = ?rss_before.as_ref().map(|snapshot| snapshot.rss_bytes),
        "Starting solve"
    );
    if mode == SolveMode::Simplex {
        debug!(
            component = "solver",
            operation = "configure",
            status = "success",
            ratio_test = params.ratio_test.as_str(),
            "HiGHS selects its own ratio test; requested rule is advisory"
        );
    }

    let fallback = mode == SolveMode::Simplex
        && params.method == SimplexMethod::DualWithPrimalFallback;
    let retry_problem = fallback.then(|| input.problem.clone());
    let first_method = match mode {
        SolveMode::Simplex => params.method,
        SolveMode::Exact => SimplexMethod::Primal,
    };
    let mut result = run_attempt(input.problem, input.direction, mode, params, first_method);
    if let Some(retry) = retry_problem {
        let outcome = result.as_ref().map(SolvedModel::status).map_err(|err| *err);
        if should_retry_with_primal(outcome) {
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                method = SimplexMethod::Dual.as_str(),
                "Dual simplex failed; retrying with primal simplex"
            );
            result = run_attempt(retry, input.direction, mode, params, SimplexMethod::Primal);
        }
    }
    let solved = result?;

    let model_status = solved.status();
    let presolve = presolve_enabled(mode, params);
    let mapping = map_status(
        model_status,
        int_info(&solved, "primal_solution_status"),
        int_info(&solved, "dual_solution_status"),
        input.direction,
        presolve,
    );
    let iterations = int_info(&solved, "simplex_iteration_count")
        .and_then(|count| u64::try_from(count).ok())
        .unwrap_or(0);

    let mut solution = BasicSolution {
        status: mapping.status,
        primal_status: mapping.primal_status,
        dual_status: mapping.dual_status,
        iterations,
        ..BasicSolution::default()
    };
    if mapping.keep_values {
        let values = solved.get_solution();
        solution.objective_value = solved.objective_value() + input.objective_constant;
        solution.column_primal = sized(values.columns(), input.num_columns);
        solution.column_dual = sized(values.dual_columns(), input.num_columns);
        solution.row_primal = sized(values.rows(), input.num_rows);
        solution.row_dual = sized(values.dual_rows(), input.num_rows);
    }

    let solve_ms = solve_started.elapsed().as_secs_f64() * 1000.0;
    let rss_after = capture_rss("solve_end");
    let rss_delta_bytes = rss_delta(rss_before.as_ref(), rss_after.as_ref());
    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_version = %solver_version,
        mode = mode.as_str(),
        model_status = model_status_string(model_status),
        solution_status = mapping.status.as_str(),
        primal_status = mapping.primal_status.as_str(),
        dual_status = mapping.dual_status.as_str(),
        simplex_iterations = iterations,
        objective_value = solution.objective_value,
        duration_ms = solve_ms,
        rss_bytes = ?rss_after.as_ref().map(|snapshot| snapshot.rss_bytes),
        rss_delta_bytes = ?rss_delta_bytes,
        "HiGHS solve completed"
    );

    problem.record_solution(solution)?;

    match mapping.error {
        Some(err) => {
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                mode = mode.as_str(),
                model_status = model_status_string(model_status),
                error = err.symbol(),
                simplex_iterations = iterations,
                duration_ms = solve_ms,
                "Solve finished without a usable result"
            );
            Err(err.into())
        }
        None => Ok(()),
    }
}
