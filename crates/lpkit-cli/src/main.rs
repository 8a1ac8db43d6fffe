mod logging;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use lpkit_core::{
    MessageLevel, Pricing, Problem, ProblemError, RatioTest, SimplexMethod, SimplexParams,
    SolveError,
};
use lpkit_highs::{SolveMode, engine_info, exact, simplex, translate_file};
use serde::Serialize;
use tracing::{debug, info};

const SCHEMA_VERSION: u32 = 1;
/// Exit status when the model was solved but the engine reported an error.
const EXIT_SOLVE_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Solve LP and MPS model files with lpkit")]
struct Cli {
    /// Log filter (for example `debug` or `lpkit_highs=trace`); overrides LPKIT_TRACE
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a model file, solve it and print the result
    Solve(SolveArgs),
    /// Print engine and build information
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct SolveArgs {
    /// Model file in MPS or CPLEX LP format
    path: PathBuf,

    /// Use the engine's strictest numerical settings
    #[arg(long)]
    exact: bool,

    #[arg(long, value_enum, default_value = "primal")]
    method: MethodArg,

    #[arg(long, value_enum, default_value = "pse")]
    pricing: PricingArg,

    #[arg(long, value_enum, default_value = "harris")]
    ratio_test: RatioTestArg,

    /// Engine message level
    #[arg(long, value_enum, default_value = "err")]
    msg_level: MessageLevelArg,

    #[arg(long)]
    iteration_limit: Option<u32>,

    /// Time limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Stop once the objective passes this value
    #[arg(long)]
    objective_limit: Option<f64>,

    #[arg(long)]
    presolve: bool,

    /// Include per-row and per-column values in the report
    #[arg(long)]
    values: bool,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum MethodArg {
    Primal,
    DualPrimal,
    Dual,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum PricingArg {
    Standard,
    Pse,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum RatioTestArg {
    Standard,
    Harris,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum MessageLevelArg {
    Off,
    Err,
    On,
    All,
    Dbg,
}

impl From<MethodArg> for SimplexMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Primal => SimplexMethod::Primal,
            MethodArg::DualPrimal => SimplexMethod::DualWithPrimalFallback,
            MethodArg::Dual => SimplexMethod::Dual,
        }
    }
}

impl From<PricingArg> for Pricing {
    fn from(arg: PricingArg) -> Self {
        match arg {
            PricingArg::Standard => Pricing::Standard,
            PricingArg::Pse => Pricing::ProjectedSteepestEdge,
        }
    }
}

impl From<RatioTestArg> for RatioTest {
    fn from(arg: RatioTestArg) -> Self {
        match arg {
            RatioTestArg::Standard => RatioTest::Standard,
            RatioTestArg::Harris => RatioTest::HarrisTwoPass,
        }
    }
}

impl From<MessageLevelArg> for MessageLevel {
    fn from(arg: MessageLevelArg) -> Self {
        match arg {
            MessageLevelArg::Off => MessageLevel::Off,
            MessageLevelArg::Err => MessageLevel::ErrorsOnly,
            MessageLevelArg::On => MessageLevel::Normal,
            MessageLevelArg::All => MessageLevel::All,
            MessageLevelArg::Dbg => MessageLevel::Debug,
        }
    }
}

#[derive(Debug, Serialize)]
struct ValueRow {
    index: usize,
    name: String,
    primal: f64,
    dual: f64,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    schema_version: u32,
    model: String,
    mode: &'static str,
    status: &'static str,
    primal_status: &'static str,
    dual_status: &'static str,
    objective_value: f64,
    iterations: u64,
    duration_ms: f64,
    error_code: Option<&'static str>,
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rows: Vec<ValueRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    columns: Vec<ValueRow>,
}

#[derive(Debug, Serialize)]
struct InfoReport {
    lpkit_version: &'static str,
    engine: &'static str,
    engine_version: String,
}

#[derive(Debug)]
struct InputError {
    message: String,
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[INVALID_INPUT] {}", self.message)
    }
}

impl std::error::Error for InputError {}

fn boxed_input_error(message: impl Into<String>) -> Box<dyn std::error::Error> {
    Box::new(InputError {
        message: message.into(),
    })
}

fn main() {
    match run() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref())?;
    match cli.command {
        Command::Solve(args) => solve_command(&args),
        Command::Info(args) => info_command(&args),
    }
}

fn build_params(args: &SolveArgs) -> Result<SimplexParams, Box<dyn std::error::Error>> {
    let mut params = SimplexParams::new()
        .with_message_level(args.msg_level.into())
        .with_method(args.method.into())
        .with_pricing(args.pricing.into())
        .with_ratio_test(args.ratio_test.into())
        .with_presolve(args.presolve);
    if let Some(limit) = args.iteration_limit {
        params = params.with_iteration_limit(limit);
    }
    if let Some(seconds) = args.time_limit {
        let limit = Duration::try_from_secs_f64(seconds)
            .map_err(|err| boxed_input_error(format!("time-limit {seconds}: {err}")))?;
        params = params.with_time_limit(limit);
    }
    if let Some(limit) = args.objective_limit {
        params = params.with_objective_limit(limit);
    }
    Ok(params)
}

fn collect_values(problem: &Problem) -> Result<(Vec<ValueRow>, Vec<ValueRow>), ProblemError> {
    let mut rows = Vec::with_capacity(problem.num_rows()?);
    for index in 1..=problem.num_rows()? {
        rows.push(ValueRow {
            index,
            name: problem.row_name(index)?.to_string(),
            primal: problem.row_primal(index)?,
            dual: problem.row_dual(index)?,
        });
    }
    let mut columns = Vec::with_capacity(problem.num_columns()?);
    for index in 1..=problem.num_columns()? {
        columns.push(ValueRow {
            index,
            name: problem.column_name(index)?.to_string(),
            primal: problem.column_primal(index)?,
            dual: problem.column_dual(index)?,
        });
    }
    Ok((rows, columns))
}

fn build_report(
    problem: &Problem,
    mode: SolveMode,
    outcome: Result<(), &SolveError>,
    duration_ms: f64,
    with_values: bool,
) -> Result<SolveReport, ProblemError> {
    let solution = problem.basic_solution()?;
    let (rows, columns) = if with_values {
        collect_values(problem)?
    } else {
        (Vec::new(), Vec::new())
    };
    Ok(SolveReport {
        schema_version: SCHEMA_VERSION,
        model: problem.name()?.to_string(),
        mode: mode.as_str(),
        status: solution.status.as_str(),
        primal_status: solution.primal_status.as_str(),
        dual_status: solution.dual_status.as_str(),
        objective_value: solution.objective_value,
        iterations: solution.iterations,
        duration_ms,
        error_code: outcome.err().map(SolveError::code),
        error: outcome.err().map(ToString::to_string),
        rows,
        columns,
    })
}

fn print_values(label: &str, values: &[ValueRow]) {
    if values.is_empty() {
        return;
    }
    println!("{:<6} {:<16} {:>16} {:>16}", label, "name", "primal", "dual");
    for value in values {
        println!(
            "{:<6} {:<16} {:>16.6} {:>16.6}",
            value.index, value.name, value.primal, value.dual
        );
    }
}

fn print_solve_table(report: &SolveReport) {
    println!("model:          {}", report.model);
    println!("mode:           {}", report.mode);
    println!("status:         {}", report.status);
    println!("primal status:  {}", report.primal_status);
    println!("dual status:    {}", report.dual_status);
    println!("objective:      {:.10}", report.objective_value);
    println!("iterations:     {}", report.iterations);
    println!("duration_ms:    {:.3}", report.duration_ms);
    if let Some(error) = &report.error {
        println!("error:          {}", error);
    }
    print_values("row", &report.rows);
    print_values("column", &report.columns);
}

fn solve_command(args: &SolveArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let params = build_params(args)?;
    let mut problem = translate_file(&args.path)?;
    let mode = if args.exact {
        SolveMode::Exact
    } else {
        SolveMode::Simplex
    };
    debug!(
        component = "cli",
        operation = "solve",
        status = "start",
        path = %args.path.display(),
        mode = mode.as_str(),
        num_rows = problem.num_rows()?,
        num_columns = problem.num_columns()?,
        "Solving model file"
    );

    let started = Instant::now();
    let outcome = match mode {
        SolveMode::Simplex => simplex(&mut problem, Some(&params)),
        SolveMode::Exact => exact(&mut problem, Some(&params)),
    };
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

    // destroyed-handle errors are not solver outcomes
    if let Err(SolveError::Problem(err)) = &outcome {
        return Err(Box::new(err.clone()));
    }
    let report = build_report(
        &problem,
        mode,
        outcome.as_ref().map(|_| ()),
        duration_ms,
        args.values,
    )?;
    info!(
        component = "cli",
        operation = "solve",
        status = "success",
        solution_status = report.status,
        objective_value = report.objective_value,
        duration_ms,
        "Model solved"
    );

    match args.format {
        OutputFormat::Table => print_solve_table(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    problem.destroy();
    Ok(if outcome.is_err() { EXIT_SOLVE_ERROR } else { 0 })
}

fn info_command(args: &InfoArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let engine = engine_info();
    let report = InfoReport {
        lpkit_version: env!("CARGO_PKG_VERSION"),
        engine: engine.name,
        engine_version: engine.version,
    };
    match args.format {
        OutputFormat::Table => {
            println!("lpkit:   {}", report.lpkit_version);
            println!("engine:  {} {}", report.engine, report.engine_version);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(0)
}
