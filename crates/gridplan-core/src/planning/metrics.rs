use serde::{Deserialize, Serialize};

/// How a solver run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The convergence test passed before the budget ran out.
    Converged,
    /// The iteration budget ran out first.
    StepLimitReached,
}

/// Per-sweep metrics emitted by value iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepMetrics {
    pub iteration: usize,
    pub l1_delta: f64,
    pub converged: bool,
}

/// Per-round metrics emitted by policy iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImprovementMetrics {
    pub iteration: usize,
    pub changed_states: usize,
    pub converged: bool,
}

/// Aggregate metrics for a complete solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunMetrics {
    pub iterations_requested: usize,
    pub iterations_completed: usize,
    pub termination: Termination,
}

impl RunMetrics {
    pub(crate) fn new(iterations_requested: usize) -> Self {
        RunMetrics {
            iterations_requested,
            iterations_completed: 0,
            termination: Termination::StepLimitReached,
        }
    }

    pub(crate) fn record(&mut self, converged: bool) {
        self.iterations_completed += 1;
        if converged {
            self.termination = Termination::Converged;
        }
    }

    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}
