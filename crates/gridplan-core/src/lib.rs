mod planning;

pub use planning::bellman::{
    VALUE_TOLERANCE, expected_value, greedy_action, l1_distance, policy_converged,
    values_converged, values_converged_within,
};
pub use planning::config::{SolverConfig, SolverConfigError};
pub use planning::error::PlanError;
pub use planning::extraction::extract_policy;
pub use planning::ids::{ActionId, StateKey};
pub use planning::mappings::{PolicyMap, ValueMap};
pub use planning::metrics::{ImprovementMetrics, RunMetrics, SweepMetrics, Termination};
pub use planning::model::{Outcome, PlanningModel};
pub use planning::policy_iteration::{
    Improvement, PolicyIteration, PolicyRun, PolicyStep, PolicySteps,
};
pub use planning::value_iteration::{ValueIteration, ValueRun, ValueStep, ValueSteps};
