use crate::config::{CommonConfig, MethodConfig};
use crate::error::SearchError;
use crate::objective::Objective;
use crate::solution::EvaluatedSolution;
use ndarray::prelude::*;
use std::fmt;

pub mod hooke_jeeves;
pub mod iterated;
pub mod nelder_mead;
pub mod simplex;

pub use self::hooke_jeeves::HookeJeeves;
pub use self::iterated::IteratedSearch;
pub use self::nelder_mead::NelderMead;
pub use self::simplex::Simplex;

/// The closed set of derivative-free methods, each holding its own
/// configuration. Variants are selected by the configuration's
/// case-insensitive method name.
pub enum Method {
    SimplexSearch(NelderMead),
    PatternSearch(HookeJeeves),
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Method::SimplexSearch(_) => write!(f, "SimplexSearch"),
            Method::PatternSearch(_) => write!(f, "PatternSearch"),
        }
    }
}

impl Method {
    /// Builds a configured method over an objective function
    pub fn new(conf: MethodConfig, obj: Box<dyn Objective>) -> Self {
        match conf {
            MethodConfig::NelderMead(c) => Method::SimplexSearch(NelderMead::new(c, obj)),
            MethodConfig::HookeJeeves(c) => Method::PatternSearch(HookeJeeves::new(c, obj)),
        }
    }

    /// Parses a JSON configuration and builds the method it selects
    pub fn from_json(text: &str, obj: Box<dyn Objective>) -> Result<Self, SearchError> {
        let conf = MethodConfig::from_json(text)?;
        Ok(Self::new(conf, obj))
    }

    /// Lowercase name of the method, usable for naming output artifacts
    pub fn name(&self) -> &'static str {
        match self {
            Method::SimplexSearch(_) => "neldermead",
            Method::PatternSearch(_) => "hookejeeves",
        }
    }

    /// The configuration fields shared by every method
    pub fn common(&self) -> &CommonConfig {
        match self {
            Method::SimplexSearch(m) => &m.config().common,
            Method::PatternSearch(m) => &m.config().common,
        }
    }

    pub fn seed(&self) -> u64 {
        match self {
            Method::SimplexSearch(m) => m.seed(),
            Method::PatternSearch(m) => m.seed(),
        }
    }

    pub fn set_seed(&mut self, seed: u64) {
        match self {
            Method::SimplexSearch(m) => m.set_seed(seed),
            Method::PatternSearch(m) => m.set_seed(seed),
        }
    }

    pub fn set_verbosity(&mut self, verbosity: usize) {
        match self {
            Method::SimplexSearch(m) => m.set_verbosity(verbosity),
            Method::PatternSearch(m) => m.set_verbosity(verbosity),
        }
    }

    /// Number of objective evaluations spent in the last run
    pub fn num_evals(&self) -> usize {
        match self {
            Method::SimplexSearch(m) => m.num_evals(),
            Method::PatternSearch(m) => m.num_evals(),
        }
    }

    pub fn num_variables(&self) -> usize {
        match self {
            Method::SimplexSearch(m) => m.num_variables(),
            Method::PatternSearch(m) => m.num_variables(),
        }
    }

    /// Wall-clock time (s) of the last run
    pub fn time(&self) -> f64 {
        match self {
            Method::SimplexSearch(m) => m.time(),
            Method::PatternSearch(m) => m.time(),
        }
    }

    /// Runs the method with its current seed, advancing it
    pub fn run(&mut self) -> EvaluatedSolution {
        match self {
            Method::SimplexSearch(m) => m.run(),
            Method::PatternSearch(m) => m.run(),
        }
    }

    /// Runs the method from a given starting point
    pub fn run_from(&mut self, p: &Array1<f64>) -> EvaluatedSolution {
        match self {
            Method::SimplexSearch(m) => m.run_from(p),
            Method::PatternSearch(m) => m.run_from(p),
        }
    }

    /// Runs the method with the indicated seed, restoring the previous
    /// seed afterward.
    pub fn run_with_seed(&mut self, seed: u64) -> EvaluatedSolution {
        match self {
            Method::SimplexSearch(m) => m.run_with_seed(seed),
            Method::PatternSearch(m) => m.run_with_seed(seed),
        }
    }
}
