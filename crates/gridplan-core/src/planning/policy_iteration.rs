use log::{debug, info};

use crate::planning::{
    bellman::{expected_value, greedy_action},
    config::{SolverConfig, SolverConfigError},
    error::PlanError,
    mappings::{PolicyMap, ValueMap, ensure_covers, ensure_legal},
    metrics::{ImprovementMetrics, RunMetrics},
    model::PlanningModel,
};

/// Result of one greedy improvement pass.
#[derive(Debug, Clone)]
pub struct Improvement {
    pub policy: PolicyMap,
    pub changed_states: usize,
}

/// Result of a policy iteration run.
#[derive(Debug, Clone)]
pub struct PolicyRun {
    pub policy: PolicyMap,
    pub values: ValueMap,
    pub metrics: RunMetrics,
    /// Number of states whose action changed in the final round.
    pub last_changed: usize,
}

/// One evaluate/improve round produced in slow mode.
#[derive(Debug, Clone)]
pub struct PolicyStep {
    pub iteration: usize,
    pub policy: PolicyMap,
    pub values: ValueMap,
    pub changed_states: usize,
    pub converged: bool,
}

/// Policy iteration over a borrowed model.
///
/// Evaluation is approximate: a fixed number of in-place sweeps of the
/// Bellman expectation backup rather than an exact linear solve.
#[derive(Debug)]
pub struct PolicyIteration<'m, M: ?Sized> {
    model: &'m M,
    config: SolverConfig,
}

impl<'m, M> PolicyIteration<'m, M>
where
    M: PlanningModel + ?Sized,
{
    /// Build a solver without checking `config`; see [`PolicyIteration::try_new`].
    pub fn new(model: &'m M, config: SolverConfig) -> Self {
        PolicyIteration { model, config }
    }

    /// Build a solver after rejecting budgets or tolerances it cannot honour.
    pub fn try_new(model: &'m M, config: SolverConfig) -> Result<Self, SolverConfigError> {
        config.validate()?;
        Ok(PolicyIteration { model, config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Approximate the value of `policy`, starting from `values`.
    ///
    /// Each sweep updates states in key order and later states read the
    /// values already written earlier in the same sweep.
    pub fn evaluate(&self, policy: &PolicyMap, values: &ValueMap) -> Result<ValueMap, PlanError> {
        ensure_legal(self.model, policy)?;
        ensure_covers(self.model, values.len())?;
        Ok(evaluate_in_place(
            self.model,
            policy,
            values.clone(),
            self.config.evaluation_sweeps,
        ))
    }

    /// Adopt the greedy action of `values` in every state where it differs.
    pub fn improve(&self, policy: &PolicyMap, values: &ValueMap) -> Result<Improvement, PlanError> {
        ensure_covers(self.model, policy.len())?;
        ensure_covers(self.model, values.len())?;
        improve(self.model, policy, values)
    }

    /// Run one evaluate/improve round.
    pub fn step(&self, policy: &PolicyMap, values: &ValueMap) -> Result<PolicyStep, PlanError> {
        ensure_legal(self.model, policy)?;
        ensure_covers(self.model, values.len())?;

        let sweeps = self.config.evaluation_sweeps;
        let values = evaluate_in_place(self.model, policy, values.clone(), sweeps);
        let improvement = improve(self.model, policy, &values)?;
        Ok(PolicyStep {
            iteration: 1,
            converged: improvement.changed_states == 0,
            changed_states: improvement.changed_states,
            policy: improvement.policy,
            values,
        })
    }

    /// Iterate from `initial_policy` with every value starting at zero.
    pub fn run(&self, initial_policy: &PolicyMap) -> Result<PolicyRun, PlanError> {
        let values = ValueMap::zeros(self.model.state_count());
        self.run_from(initial_policy, &values)
    }

    /// Iterate from a policy and a value estimate until stable or out of budget.
    pub fn run_from(
        &self,
        initial_policy: &PolicyMap,
        initial_values: &ValueMap,
    ) -> Result<PolicyRun, PlanError> {
        self.run_with_hook(initial_policy, initial_values, |_| {})
    }

    /// Run and invoke a callback after each improvement pass.
    pub fn run_with_hook<FHook>(
        &self,
        initial_policy: &PolicyMap,
        initial_values: &ValueMap,
        mut on_improvement: FHook,
    ) -> Result<PolicyRun, PlanError>
    where
        FHook: FnMut(&ImprovementMetrics),
    {
        ensure_legal(self.model, initial_policy)?;
        ensure_covers(self.model, initial_values.len())?;

        let mut metrics = RunMetrics::new(self.config.max_iterations);
        let mut policy = initial_policy.clone();
        let mut values = initial_values.clone();
        let mut last_changed = 0;

        for iteration in 1..=self.config.max_iterations {
            values = evaluate_in_place(self.model, &policy, values, self.config.evaluation_sweeps);
            let improvement = improve(self.model, &policy, &values)?;
            let converged = improvement.changed_states == 0;
            debug!(
                "policy iteration round {iteration}: {} states changed action",
                improvement.changed_states
            );

            let round_metrics = ImprovementMetrics {
                iteration,
                changed_states: improvement.changed_states,
                converged,
            };
            on_improvement(&round_metrics);
            metrics.record(converged);

            policy = improvement.policy;
            last_changed = improvement.changed_states;
            if converged {
                break;
            }
        }

        info!(
            "policy iteration stopped after {} rounds ({:?})",
            metrics.iterations_completed, metrics.termination
        );

        Ok(PolicyRun {
            policy,
            values,
            metrics,
            last_changed,
        })
    }

    /// Drive the solver one evaluate/improve round at a time.
    pub fn steps(
        &self,
        initial_policy: &PolicyMap,
        initial_values: &ValueMap,
    ) -> Result<PolicySteps<'m, M>, PlanError> {
        ensure_legal(self.model, initial_policy)?;
        ensure_covers(self.model, initial_values.len())?;
        Ok(PolicySteps {
            model: self.model,
            config: self.config,
            policy: initial_policy.clone(),
            values: initial_values.clone(),
            iteration: 0,
            done: false,
        })
    }
}

/// Slow-mode iterator returned by [`PolicyIteration::steps`].
#[derive(Debug)]
pub struct PolicySteps<'m, M: ?Sized> {
    model: &'m M,
    config: SolverConfig,
    policy: PolicyMap,
    values: ValueMap,
    iteration: usize,
    done: bool,
}

impl<M> PolicySteps<'_, M>
where
    M: PlanningModel + ?Sized,
{
    /// Latest policy, usable as a resume point.
    pub fn policy(&self) -> &PolicyMap {
        &self.policy
    }

    /// Latest value estimate, usable as a resume point.
    pub fn values(&self) -> &ValueMap {
        &self.values
    }
}

impl<M> Iterator for PolicySteps<'_, M>
where
    M: PlanningModel + ?Sized,
{
    type Item = Result<PolicyStep, PlanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.iteration >= self.config.max_iterations {
            return None;
        }

        let values = evaluate_in_place(
            self.model,
            &self.policy,
            self.values.clone(),
            self.config.evaluation_sweeps,
        );
        let improvement = match improve(self.model, &self.policy, &values) {
            Ok(improvement) => improvement,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };

        self.iteration += 1;
        let converged = improvement.changed_states == 0;
        self.done = converged;
        self.policy = improvement.policy;
        self.values = values;

        Some(Ok(PolicyStep {
            iteration: self.iteration,
            policy: self.policy.clone(),
            values: self.values.clone(),
            changed_states: improvement.changed_states,
            converged,
        }))
    }
}

fn evaluate_in_place<M>(
    model: &M,
    policy: &PolicyMap,
    mut values: ValueMap,
    sweeps: usize,
) -> ValueMap
where
    M: PlanningModel + ?Sized,
{
    let discount = model.discount();
    for _ in 0..sweeps {
        for state in model.state_keys() {
            let expected = expected_value(model, state, policy[state], &values);
            *values.slot_mut(state) = model.reward(state) + discount * expected;
        }
    }
    values
}

fn improve<M>(model: &M, policy: &PolicyMap, values: &ValueMap) -> Result<Improvement, PlanError>
where
    M: PlanningModel + ?Sized,
{
    let mut improved = policy.clone();
    let mut changed_states = 0;

    for state in model.state_keys() {
        let (action, _) = greedy_action(model, state, values)?;
        if action != policy[state] {
            improved.set(state, action);
            changed_states += 1;
        }
    }

    Ok(Improvement {
        policy: improved,
        changed_states,
    })
}
