//! Translation of simplex parameters into HiGHS options.

use lpkit_core::{MessageLevel, Pricing, SimplexMethod, SimplexParams};

/// Option value types for HiGHS solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighsOption {
    Bool(bool),
    Int(i32),
    Float(f64),
    Str(&'static str),
}

/// Which solve entry point the options are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMode {
    Simplex,
    Exact,
}

impl SolveMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SolveMode::Simplex => "simplex",
            SolveMode::Exact => "exact",
        }
    }
}

const SIMPLEX_STRATEGY_DUAL: i32 = 1;
const SIMPLEX_STRATEGY_PRIMAL: i32 = 4;
const EDGE_WEIGHT_DANTZIG: i32 = 0;
const EDGE_WEIGHT_STEEPEST_EDGE: i32 = 2;
/// Smallest feasibility tolerance HiGHS accepts.
const EXACT_FEASIBILITY_TOLERANCE: f64 = 1e-10;

pub(crate) type OptionList = Vec<(&'static str, HighsOption)>;

/// HiGHS has one switch for all console output, so `ErrorsOnly` is as
/// silent as `Off`. Engine failures still reach the caller as `OptError`s
/// and as `warn!` events from the solver.
fn message_options(level: MessageLevel, options: &mut OptionList) {
    let (output, dev_level) = match level {
        MessageLevel::Off | MessageLevel::ErrorsOnly => (false, 0),
        MessageLevel::Normal => (true, 0),
        MessageLevel::All => (true, 1),
        MessageLevel::Debug => (true, 2),
    };
    options.push(("output_flag", HighsOption::Bool(output)));
    options.push(("log_to_console", HighsOption::Bool(output)));
    if output {
        options.push(("log_dev_level", HighsOption::Int(dev_level)));
    }
}

fn limit_options(params: &SimplexParams, options: &mut OptionList) {
    if let Some(limit) = params.iteration_limit {
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        options.push(("simplex_iteration_limit", HighsOption::Int(limit)));
    }
    if let Some(limit) = params.time_limit {
        options.push(("time_limit", HighsOption::Float(limit.as_secs_f64())));
    }
}

/// Options for one solve attempt.
///
/// `method` overrides `params.method`, which lets the dual-then-primal
/// fallback issue its second attempt.
pub(crate) fn engine_options(
    mode: SolveMode,
    params: &SimplexParams,
    method: SimplexMethod,
) -> OptionList {
    let mut options = vec![("solver", HighsOption::Str("simplex"))];
    message_options(params.message_level, &mut options);
    limit_options(params, &mut options);

    match mode {
        SolveMode::Simplex => {
            let strategy = match method {
                SimplexMethod::Primal => SIMPLEX_STRATEGY_PRIMAL,
                SimplexMethod::Dual | SimplexMethod::DualWithPrimalFallback => {
                    SIMPLEX_STRATEGY_DUAL
                }
            };
            options.push(("simplex_strategy", HighsOption::Int(strategy)));
            let edge_weight = match params.pricing {
                Pricing::Standard => EDGE_WEIGHT_DANTZIG,
                Pricing::ProjectedSteepestEdge => EDGE_WEIGHT_STEEPEST_EDGE,
            };
            options.push((
                "simplex_primal_edge_weight_strategy",
                HighsOption::Int(edge_weight),
            ));
            options.push((
                "simplex_dual_edge_weight_strategy",
                HighsOption::Int(edge_weight),
            ));
            let presolve = if params.presolve { "on" } else { "off" };
            options.push(("presolve", HighsOption::Str(presolve)));
            if let Some(bound) = params.objective_limit {
                options.push(("objective_bound", HighsOption::Float(bound)));
            }
        }
        SolveMode::Exact => {
            options.push((
                "simplex_strategy",
                HighsOption::Int(SIMPLEX_STRATEGY_PRIMAL),
            ));
            options.push(("presolve", HighsOption::Str("off")));
            options.push(("simplex_scale_strategy", HighsOption::Int(0)));
            options.push((
                "primal_feasibility_tolerance",
                HighsOption::Float(EXACT_FEASIBILITY_TOLERANCE),
            ));
            options.push((
                "dual_feasibility_tolerance",
                HighsOption::Float(EXACT_FEASIBILITY_TOLERANCE),
            ));
        }
    }
    options
}

/// Whether the presolver runs for this attempt.
pub(crate) fn presolve_enabled(mode: SolveMode, params: &SimplexParams) -> bool {
    mode == SolveMode::Simplex && params.presolve
}

pub(crate) fn apply(model: &mut highs::Model, options: &OptionList) {
    for &(name, value) in options {
        match value {
            HighsOption::Bool(val) => model.set_option(name, val),
            HighsOption::Int(val) => model.set_option(name, val),
            HighsOption::Float(val) => model.set_option(name, val),
            HighsOption::Str(val) => model.set_option(name, val),
        }
    }
}
