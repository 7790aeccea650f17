use gridplan_core::{
    ActionId, Outcome, PlanningModel, PolicyIteration, PolicyMap, SolverConfig,
    SolverConfigError, StateKey, Termination, ValueIteration, ValueMap, extract_policy,
};

/// One decision state choosing between two absorbing payoffs.
struct TwoDoors {
    decision: Vec<Vec<Outcome>>,
    absorb: [Vec<Outcome>; 2],
}

impl TwoDoors {
    fn new() -> Self {
        TwoDoors {
            decision: vec![
                vec![Outcome::new(1.0, StateKey::from(1))],
                vec![Outcome::new(1.0, StateKey::from(2))],
            ],
            absorb: [
                vec![Outcome::new(0.0, StateKey::from(1))],
                vec![Outcome::new(0.0, StateKey::from(2))],
            ],
        }
    }
}

impl PlanningModel for TwoDoors {
    fn state_count(&self) -> usize {
        3
    }

    fn discount(&self) -> f64 {
        0.9
    }

    fn reward(&self, state: StateKey) -> f64 {
        match state.index() {
            1 => 1.0,
            2 => 5.0,
            _ => 0.0,
        }
    }

    fn num_actions(&self, state: StateKey) -> usize {
        if state.index() == 0 { 2 } else { 1 }
    }

    fn outcomes(&self, state: StateKey, action: ActionId) -> &[Outcome] {
        let list = match state.index() {
            0 => self.decision.get(action.index()),
            1 | 2 if action.index() == 0 => Some(&self.absorb[state.index() - 1]),
            _ => None,
        };
        list.map(Vec::as_slice).unwrap_or(&[])
    }
}

#[test]
fn public_value_iteration_prefers_the_larger_payoff() {
    let model = TwoDoors::new();
    let run = ValueIteration::new(&model, SolverConfig::default())
        .run(&ValueMap::zeros(3))
        .expect("run should succeed");

    assert_eq!(run.metrics.termination, Termination::Converged);
    assert!((run.values[StateKey::from(0)] - 4.5).abs() < 1e-9);

    let policy = extract_policy(&model, &run.values).expect("extraction should succeed");
    assert_eq!(policy[StateKey::from(0)], ActionId::from(1));
}

#[test]
fn public_policy_iteration_switches_doors_once() {
    let model = TwoDoors::new();
    let initial = PolicyMap::uniform(3, ActionId::from(0));

    let run = PolicyIteration::new(&model, SolverConfig::default())
        .run(&initial)
        .expect("run should succeed");

    assert_eq!(run.metrics.iterations_completed, 2);
    assert_eq!(run.policy[StateKey::from(0)], ActionId::from(1));
    assert_eq!(initial[StateKey::from(0)], ActionId::from(0));
}

#[test]
fn default_config_yaml_parses() {
    let config = SolverConfig::from_default_yaml().expect("default yaml should parse");
    assert_eq!(config, SolverConfig::default());
}

#[test]
fn partial_yaml_falls_back_to_defaults() {
    let config = SolverConfig::from_yaml_str("max_iterations: 1\n").expect("yaml should parse");
    assert_eq!(config, SolverConfig::single_step());
}

#[test]
fn zero_budget_is_rejected() {
    let err = SolverConfig::from_yaml_str("max_iterations: 0\n").expect_err("should fail");
    assert!(matches!(err, SolverConfigError::Invalid(_)));
}

#[test]
fn checked_constructors_reject_unusable_configs() {
    let model = TwoDoors::new();
    let nan_tolerance = SolverConfig {
        tolerance: f64::NAN,
        ..SolverConfig::default()
    };
    let no_sweeps = SolverConfig {
        evaluation_sweeps: 0,
        ..SolverConfig::default()
    };

    assert!(matches!(
        ValueIteration::try_new(&model, nan_tolerance),
        Err(SolverConfigError::Invalid(_))
    ));
    assert!(matches!(
        PolicyIteration::try_new(&model, no_sweeps),
        Err(SolverConfigError::Invalid(_))
    ));

    let outcome = ValueIteration::try_new(&model, SolverConfig::default())
        .map(|solver| solver.run(&ValueMap::zeros(3)));
    assert!(matches!(outcome, Ok(Ok(ref run)) if run.metrics.converged()));
}
