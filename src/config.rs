use crate::error::SearchError;
use serde::Deserialize;
use serde_json::Value;

/// Configuration fields shared by every derivative-free method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    /// RNG seed
    pub seed: u64,
    /// number of independent runs
    pub numruns: usize,
    /// global budget of calls to the objective function
    pub maxevals: usize,
    /// budget of calls to the objective function within one cycle
    #[serde(rename = "maxevalscycle")]
    pub maxevals_cycle: usize,
}

impl Default for CommonConfig {
    fn default() -> Self {
        CommonConfig {
            seed: 1,
            numruns: 20,
            maxevals: 20000,
            maxevals_cycle: 1000,
        }
    }
}

impl CommonConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.numruns == 0 {
            return Err(SearchError::InvalidParameter(
                "numruns = 0 (must be positive)".to_string(),
            ));
        }
        if self.maxevals == 0 {
            return Err(SearchError::InvalidParameter(
                "maxevals = 0 (must be positive)".to_string(),
            ));
        }
        if self.maxevals_cycle == 0 {
            return Err(SearchError::InvalidParameter(
                "maxevalscycle = 0 (must be positive)".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_reflection() -> f64 {
    1.0
}

fn default_expansion() -> f64 {
    2.0
}

fn default_contraction() -> f64 {
    0.5
}

fn default_shrink() -> f64 {
    0.5
}

fn default_tolerance() -> f64 {
    1e-2
}

/// Configuration of the simplex-transformation (Nelder-Mead) method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NelderMeadConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    #[serde(default = "default_reflection")]
    pub reflection: f64,
    #[serde(default = "default_expansion")]
    pub expansion: f64,
    #[serde(default = "default_contraction")]
    pub contraction: f64,
    #[serde(default = "default_shrink")]
    pub shrink: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        NelderMeadConfig {
            common: CommonConfig::default(),
            reflection: default_reflection(),
            expansion: default_expansion(),
            contraction: default_contraction(),
            shrink: default_shrink(),
            tolerance: default_tolerance(),
        }
    }
}

impl NelderMeadConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        self.common.validate()?;
        if self.reflection <= 0.0 {
            return Err(SearchError::InvalidParameter(format!(
                "reflection = {} (must be > 0)",
                self.reflection
            )));
        }
        if self.expansion <= 1.0 {
            return Err(SearchError::InvalidParameter(format!(
                "expansion = {} (must be > 1)",
                self.expansion
            )));
        }
        if self.contraction <= 0.0 || self.contraction >= 1.0 {
            return Err(SearchError::InvalidParameter(format!(
                "contraction = {} (must be in (0, 1))",
                self.contraction
            )));
        }
        if self.shrink <= 0.0 || self.shrink >= 1.0 {
            return Err(SearchError::InvalidParameter(format!(
                "shrink = {} (must be in (0, 1))",
                self.shrink
            )));
        }
        if self.tolerance < 0.0 {
            return Err(SearchError::InvalidParameter(format!(
                "tolerance = {} (must be >= 0)",
                self.tolerance
            )));
        }
        Ok(())
    }
}

fn default_acceleration() -> f64 {
    1.0
}

fn default_step() -> f64 {
    0.01
}

fn default_minstep() -> f64 {
    1e-5
}

/// Configuration of the pattern-search (Hooke-Jeeves) method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HookeJeevesConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    #[serde(default = "default_acceleration")]
    pub acceleration: f64,
    #[serde(default = "default_contraction")]
    pub contraction: f64,
    /// initial stepsize, as a fraction of the domain range
    #[serde(default = "default_step")]
    pub step: f64,
    /// minimum stepsize, as a fraction of the domain range
    #[serde(default = "default_minstep")]
    pub minstep: f64,
}

impl Default for HookeJeevesConfig {
    fn default() -> Self {
        HookeJeevesConfig {
            common: CommonConfig::default(),
            acceleration: default_acceleration(),
            contraction: default_contraction(),
            step: default_step(),
            minstep: default_minstep(),
        }
    }
}

impl HookeJeevesConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        self.common.validate()?;
        if self.acceleration < 1.0 {
            return Err(SearchError::InvalidParameter(format!(
                "acceleration = {} (must be >= 1)",
                self.acceleration
            )));
        }
        if self.contraction <= 0.0 || self.contraction >= 1.0 {
            return Err(SearchError::InvalidParameter(format!(
                "contraction = {} (must be in (0, 1))",
                self.contraction
            )));
        }
        if self.step <= 0.0 {
            return Err(SearchError::InvalidParameter(format!(
                "step = {} (must be > 0)",
                self.step
            )));
        }
        if self.minstep < 0.0 {
            return Err(SearchError::InvalidParameter(format!(
                "minstep = {} (must be >= 0)",
                self.minstep
            )));
        }
        Ok(())
    }
}

/// Validated configuration for one of the supported methods. The
/// variant is selected by the case-insensitive `"method"` key of the
/// configuration mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodConfig {
    NelderMead(NelderMeadConfig),
    HookeJeeves(HookeJeevesConfig),
}

impl MethodConfig {
    /// Parses a JSON configuration document. Unset keys take their
    /// documented defaults; invalid values and unknown method names are
    /// fatal configuration errors.
    pub fn from_json(text: &str) -> Result<Self, SearchError> {
        let v: Value =
            serde_json::from_str(text).map_err(|e| SearchError::MalformedConfig(e.to_string()))?;
        Self::from_value(&v)
    }

    /// Builds a method configuration from an already-parsed JSON value.
    pub fn from_value(v: &Value) -> Result<Self, SearchError> {
        let name = v
            .get("method")
            .and_then(Value::as_str)
            .ok_or(SearchError::MissingMethod)?;
        match name.to_lowercase().as_str() {
            "neldermead" => {
                let conf: NelderMeadConfig = serde_json::from_value(v.clone())
                    .map_err(|e| SearchError::MalformedConfig(e.to_string()))?;
                conf.validate()?;
                Ok(MethodConfig::NelderMead(conf))
            }
            "hookejeeves" => {
                let conf: HookeJeevesConfig = serde_json::from_value(v.clone())
                    .map_err(|e| SearchError::MalformedConfig(e.to_string()))?;
                conf.validate()?;
                Ok(MethodConfig::HookeJeeves(conf))
            }
            other => Err(SearchError::UnknownMethod(other.to_string())),
        }
    }

    /// The fields shared by every method
    pub fn common(&self) -> &CommonConfig {
        match self {
            MethodConfig::NelderMead(c) => &c.common,
            MethodConfig::HookeJeeves(c) => &c.common,
        }
    }

    /// Lowercase name of the configured method
    pub fn method_name(&self) -> &'static str {
        match self {
            MethodConfig::NelderMead(_) => "neldermead",
            MethodConfig::HookeJeeves(_) => "hookejeeves",
        }
    }
}
