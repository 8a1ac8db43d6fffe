//! Simplex control parameters.

use std::time::Duration;

/// How much the engine reports while solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageLevel {
    Off,
    ErrorsOnly,
    Normal,
    #[default]
    All,
    Debug,
}

/// Simplex variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimplexMethod {
    #[default]
    Primal,
    /// Dual simplex, switching to primal if the dual attempt fails.
    DualWithPrimalFallback,
    Dual,
}

/// Pricing rule for choosing the entering variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pricing {
    /// Textbook (Dantzig) pricing.
    Standard,
    #[default]
    ProjectedSteepestEdge,
}

/// Ratio-test rule for choosing the leaving variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatioTest {
    Standard,
    #[default]
    HarrisTwoPass,
}

macro_rules! impl_as_str {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }
    };
}

impl_as_str!(MessageLevel {
    Off => "off",
    ErrorsOnly => "errors_only",
    Normal => "normal",
    All => "all",
    Debug => "debug",
});
impl_as_str!(SimplexMethod {
    Primal => "primal",
    DualWithPrimalFallback => "dual_primal",
    Dual => "dual",
});
impl_as_str!(Pricing {
    Standard => "standard",
    ProjectedSteepestEdge => "steepest_edge",
});
impl_as_str!(RatioTest {
    Standard => "standard",
    HarrisTwoPass => "harris",
});

/// Parameters passed to a simplex or exact solve.
///
/// Nothing here is validated; values are forwarded to the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimplexParams {
    pub message_level: MessageLevel,
    pub method: SimplexMethod,
    pub pricing: Pricing,
    pub ratio_test: RatioTest,
    /// Simplex iteration limit. `None` means no limit.
    pub iteration_limit: Option<u32>,
    /// Wall-clock limit. `None` means no limit.
    pub time_limit: Option<Duration>,
    /// Run the engine presolver before the simplex.
    pub presolve: bool,
    /// Stop once the objective passes this value in the improving direction.
    pub objective_limit: Option<f64>,
}

impl SimplexParams {
    /// Create a parameter set with engine defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message_level(mut self, level: MessageLevel) -> Self {
        self.message_level = level;
        self
    }

    pub fn with_method(mut self, method: SimplexMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_ratio_test(mut self, ratio_test: RatioTest) -> Self {
        self.ratio_test = ratio_test;
        self
    }

    /// Set the simplex iteration limit.
    pub fn with_iteration_limit(mut self, limit: u32) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enable or disable presolve.
    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = enabled;
        self
    }

    pub fn with_objective_limit(mut self, limit: f64) -> Self {
        self.objective_limit = Some(limit);
        self
    }
}
