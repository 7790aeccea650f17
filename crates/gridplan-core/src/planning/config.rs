use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::planning::bellman::VALUE_TOLERANCE;

const DEFAULT_SOLVER_CONFIG_YAML: &str = include_str!("../../config/solver.default.yaml");

/// Iteration budgets and tolerance shared by both solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Outer iteration budget: Bellman sweeps for value iteration,
    /// evaluate/improve rounds for policy iteration.
    pub max_iterations: usize,
    /// In-place evaluation sweeps per policy iteration round.
    pub evaluation_sweeps: usize,
    /// Aggregate L1 threshold for value convergence.
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_iterations: 100,
            evaluation_sweeps: 50,
            tolerance: VALUE_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Config that performs exactly one solver iteration per run.
    pub fn single_step() -> Self {
        SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        }
    }

    /// Return a copy with a different outer iteration budget.
    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        SolverConfig {
            max_iterations,
            ..self
        }
    }

    /// Parse a solver config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SolverConfigError> {
        let config: SolverConfig = serde_yaml::from_str(yaml).map_err(SolverConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a solver config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SolverConfigError> {
        let yaml = fs::read_to_string(path).map_err(SolverConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SOLVER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SolverConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Reject budgets and tolerances no solver run can make sense of.
    pub fn validate(&self) -> Result<(), SolverConfigError> {
        if self.max_iterations == 0 {
            return Err(SolverConfigError::Invalid(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        if self.evaluation_sweeps == 0 {
            return Err(SolverConfigError::Invalid(
                "evaluation_sweeps must be greater than 0".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SolverConfigError::Invalid(
                "tolerance must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Error type for loading and validating `SolverConfig`.
#[derive(Debug)]
pub enum SolverConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for SolverConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            SolverConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            SolverConfigError::Invalid(err) => write!(f, "invalid solver config: {err}"),
        }
    }
}

impl std::error::Error for SolverConfigError {}
