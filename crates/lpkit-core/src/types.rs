/// Magnitude at or beyond which a bound is treated as infinite.
pub const INFINITE_BOUND: f64 = 1e20;

/// Optimization direction of the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveDirection {
    Minimize,
    Maximize,
}

impl ObjectiveDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectiveDirection::Minimize => "minimize",
            ObjectiveDirection::Maximize => "maximize",
        }
    }
}

/// Which of the two limits of a row or column are in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundType {
    /// Both limits ignored.
    #[default]
    Free,
    /// Only the lower limit applies.
    Lower,
    /// Only the upper limit applies.
    Upper,
    /// Both limits apply.
    Double,
    /// Lower limit is the fixed value; upper is ignored.
    Fixed,
}

impl BoundType {
    pub fn as_str(self) -> &'static str {
        match self {
            BoundType::Free => "free",
            BoundType::Lower => "lower",
            BoundType::Upper => "upper",
            BoundType::Double => "double",
            BoundType::Fixed => "fixed",
        }
    }
}

/// Tagged bounds for a row or a column.
///
/// Limits are stored exactly as supplied, whatever the tag says; use
/// [`Bounds::range`] for the interval the tag actually describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub kind: BoundType,
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(kind: BoundType, lower: f64, upper: f64) -> Self {
        Self { kind, lower, upper }
    }

    pub fn free() -> Self {
        Self::new(BoundType::Free, 0.0, 0.0)
    }

    /// Effective `(lower, upper)` interval.
    pub fn range(&self) -> (f64, f64) {
        match self.kind {
            BoundType::Free => (f64::NEG_INFINITY, f64::INFINITY),
            BoundType::Lower => (self.lower, f64::INFINITY),
            BoundType::Upper => (f64::NEG_INFINITY, self.upper),
            BoundType::Double => (self.lower, self.upper),
            BoundType::Fixed => (self.lower, self.lower),
        }
    }

    /// Classify an interval back into tagged bounds.
    ///
    /// Values at or beyond [`INFINITE_BOUND`] in magnitude count as infinite.
    pub fn from_range(lower: f64, upper: f64) -> Self {
        let has_lower = lower > -INFINITE_BOUND;
        let has_upper = upper < INFINITE_BOUND;
        match (has_lower, has_upper) {
            (false, false) => Self::free(),
            (true, false) => Self::new(BoundType::Lower, lower, 0.0),
            (false, true) => Self::new(BoundType::Upper, 0.0, upper),
            (true, true) if lower == upper => Self::new(BoundType::Fixed, lower, upper),
            (true, true) => Self::new(BoundType::Double, lower, upper),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::free()
    }
}

/// Status of a basic solution or of one of its primal/dual halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolutionStatus {
    #[default]
    Undefined,
    Feasible,
    Infeasible,
    NoFeasible,
    Optimal,
    Unbounded,
}

impl SolutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::Undefined => "undefined",
            SolutionStatus::Feasible => "feasible",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::NoFeasible => "no_feasible",
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Unbounded => "unbounded",
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the latest solve attempt stored on a problem.
///
/// Vectors are indexed by 0-based position (row `i` lives at `i - 1`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicSolution {
    pub status: SolutionStatus,
    pub primal_status: SolutionStatus,
    pub dual_status: SolutionStatus,
    pub objective_value: f64,
    pub column_primal: Vec<f64>,
    pub column_dual: Vec<f64>,
    pub row_primal: Vec<f64>,
    pub row_dual: Vec<f64>,
    pub iterations: u64,
}

impl BasicSolution {
    /// True when no solve attempt has been recorded.
    pub fn is_undefined(&self) -> bool {
        self.status == SolutionStatus::Undefined
            && self.primal_status == SolutionStatus::Undefined
            && self.dual_status == SolutionStatus::Undefined
    }
}
