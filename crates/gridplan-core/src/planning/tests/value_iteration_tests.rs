use crate::{
    ActionId, PlanError, SolverConfig, StateKey, Termination, ValueIteration, ValueMap,
    extract_policy,
};

use super::ChainModel;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn deterministic_chain_converges_to_discounted_goal_values() {
    let model = ChainModel::new(4, 1.0, -0.04, 0.9, 0.0);
    let solver = ValueIteration::new(&model, SolverConfig::default());

    let run = solver.run(&ValueMap::zeros(4)).expect("run should succeed");

    assert_eq!(run.metrics.termination, Termination::Converged);
    assert!(run.last_delta < SolverConfig::default().tolerance);
    assert_close(run.values[StateKey::from(0)], 1.0);
    assert_close(run.values[StateKey::from(1)], 0.86);
    assert_close(run.values[StateKey::from(2)], 0.734);
    assert_close(run.values[StateKey::from(3)], 0.6206);

    let policy = extract_policy(&model, &run.values).expect("extraction should succeed");
    assert!(policy.iter().all(|(_, action)| action == ActionId::from(0)));
}

#[test]
fn sweep_reads_only_the_previous_iterate() {
    let model = ChainModel::new(3, 1.0, 0.0, 0.9, 0.0);
    let solver = ValueIteration::new(&model, SolverConfig::default());

    let values = solver.sweep(&ValueMap::zeros(3)).expect("sweep should succeed");

    // State 1 must not see the goal value written earlier in the same sweep.
    assert_eq!(values, ValueMap::from(vec![1.0, 0.0, 0.0]));
}

#[test]
fn single_step_budget_stops_at_step_limit() {
    let model = ChainModel::new(4, 1.0, -0.04, 0.9, 0.1);
    let solver = ValueIteration::new(&model, SolverConfig::single_step());
    let initial = ValueMap::zeros(4);

    let run = solver.run(&initial).expect("run should succeed");

    assert_eq!(run.metrics.iterations_requested, 1);
    assert_eq!(run.metrics.iterations_completed, 1);
    assert_eq!(run.metrics.termination, Termination::StepLimitReached);
    assert_eq!(run.values, solver.sweep(&initial).expect("sweep should succeed"));
}

#[test]
fn hook_observes_every_sweep() {
    let model = ChainModel::new(5, 1.0, -0.04, 0.9, 0.1);
    let solver = ValueIteration::new(&model, SolverConfig::default());

    let mut seen = Vec::new();
    let run = solver
        .run_with_hook(&ValueMap::zeros(5), |metrics| seen.push(*metrics))
        .expect("run should succeed");

    assert_eq!(seen.len(), run.metrics.iterations_completed);
    assert!(seen.iter().enumerate().all(|(idx, m)| m.iteration == idx + 1));
    let last = seen.last().expect("at least one sweep");
    assert!(last.converged);
    assert!(seen[..seen.len() - 1].iter().all(|m| !m.converged));
}

#[test]
fn slow_mode_steps_reproduce_a_full_run() {
    let model = ChainModel::new(5, 1.0, -0.04, 0.9, 0.1);
    let solver = ValueIteration::new(&model, SolverConfig::default());
    let initial = ValueMap::zeros(5);

    let run = solver.run(&initial).expect("run should succeed");
    let steps = solver
        .steps(&initial)
        .expect("steps should start")
        .collect::<Result<Vec<_>, _>>()
        .expect("every step should succeed");

    assert_eq!(steps.len(), run.metrics.iterations_completed);
    let last = steps.last().expect("at least one step");
    assert!(last.converged);
    assert_eq!(last.values, run.values);
}

#[test]
fn slow_mode_resumes_from_an_intermediate_mapping() {
    let model = ChainModel::new(5, 1.0, -0.04, 0.9, 0.1);
    let solver = ValueIteration::new(&model, SolverConfig::single_step());

    let mut values = ValueMap::zeros(5);
    let mut batch = ValueIteration::new(&model, SolverConfig::default().with_max_iterations(3))
        .steps(&values)
        .expect("steps should start");
    for _ in 0..3 {
        values = solver.run(&values).expect("run should succeed").values;
        let step = batch.next().expect("budget allows three steps").expect("step succeeds");
        assert_eq!(step.values, values);
    }
    assert!(batch.next().is_none());
}

#[test]
fn mismatched_mapping_is_rejected() {
    let model = ChainModel::new(3, 1.0, 0.0, 0.9, 0.0);
    let solver = ValueIteration::new(&model, SolverConfig::default());

    let err = solver
        .run(&ValueMap::zeros(2))
        .expect_err("short mapping should fail");

    assert_eq!(
        err,
        PlanError::MappingLength {
            expected: 3,
            found: 2
        }
    );
}
