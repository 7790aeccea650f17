use log::{debug, info};

use crate::planning::{
    bellman::{greedy_action, l1_distance},
    config::{SolverConfig, SolverConfigError},
    error::PlanError,
    mappings::{ValueMap, ensure_covers},
    metrics::{RunMetrics, SweepMetrics},
    model::PlanningModel,
};

/// Result of a value iteration run.
#[derive(Debug, Clone)]
pub struct ValueRun {
    pub values: ValueMap,
    pub metrics: RunMetrics,
    /// L1 distance between the last two iterates.
    pub last_delta: f64,
}

/// One intermediate mapping produced in slow mode.
#[derive(Debug, Clone)]
pub struct ValueStep {
    pub iteration: usize,
    pub values: ValueMap,
    pub l1_delta: f64,
    pub converged: bool,
}

/// Value iteration over a borrowed model.
///
/// Every sweep reads the previous iterate and writes a fresh mapping, so
/// updates made within one sweep are never visible to the same sweep.
#[derive(Debug)]
pub struct ValueIteration<'m, M: ?Sized> {
    model: &'m M,
    config: SolverConfig,
}

impl<'m, M> ValueIteration<'m, M>
where
    M: PlanningModel + ?Sized,
{
    /// Build a solver without checking `config`; see [`ValueIteration::try_new`].
    pub fn new(model: &'m M, config: SolverConfig) -> Self {
        ValueIteration { model, config }
    }

    /// Build a solver after rejecting budgets or tolerances it cannot honour.
    pub fn try_new(model: &'m M, config: SolverConfig) -> Result<Self, SolverConfigError> {
        config.validate()?;
        Ok(ValueIteration { model, config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Apply one Bellman optimality backup to `values`.
    pub fn sweep(&self, values: &ValueMap) -> Result<ValueMap, PlanError> {
        ensure_covers(self.model, values.len())?;
        backup(self.model, values)
    }

    /// Iterate from `initial` until converged or out of budget.
    pub fn run(&self, initial: &ValueMap) -> Result<ValueRun, PlanError> {
        self.run_with_hook(initial, |_| {})
    }

    /// Run and invoke a callback after each completed sweep.
    pub fn run_with_hook<FHook>(
        &self,
        initial: &ValueMap,
        mut on_sweep: FHook,
    ) -> Result<ValueRun, PlanError>
    where
        FHook: FnMut(&SweepMetrics),
    {
        ensure_covers(self.model, initial.len())?;

        let mut metrics = RunMetrics::new(self.config.max_iterations);
        let mut values = initial.clone();
        let mut last_delta = f64::INFINITY;

        for iteration in 1..=self.config.max_iterations {
            let fresh = backup(self.model, &values)?;
            let l1_delta = l1_distance(&fresh, &values);
            let converged = l1_delta < self.config.tolerance;
            debug!("value iteration sweep {iteration}: l1 delta {l1_delta:.6}");

            let sweep_metrics = SweepMetrics {
                iteration,
                l1_delta,
                converged,
            };
            on_sweep(&sweep_metrics);
            metrics.record(converged);

            values = fresh;
            last_delta = l1_delta;
            if converged {
                break;
            }
        }

        info!(
            "value iteration stopped after {} sweeps ({:?})",
            metrics.iterations_completed, metrics.termination
        );

        Ok(ValueRun {
            values,
            metrics,
            last_delta,
        })
    }

    /// Drive the solver one sweep at a time.
    ///
    /// The iterator yields every intermediate mapping and ends after the first
    /// converged sweep or once the budget is spent.
    pub fn steps(&self, initial: &ValueMap) -> Result<ValueSteps<'m, M>, PlanError> {
        ensure_covers(self.model, initial.len())?;
        Ok(ValueSteps {
            model: self.model,
            config: self.config,
            values: initial.clone(),
            iteration: 0,
            done: false,
        })
    }
}

/// Slow-mode iterator returned by [`ValueIteration::steps`].
#[derive(Debug)]
pub struct ValueSteps<'m, M: ?Sized> {
    model: &'m M,
    config: SolverConfig,
    values: ValueMap,
    iteration: usize,
    done: bool,
}

impl<M> ValueSteps<'_, M>
where
    M: PlanningModel + ?Sized,
{
    /// Latest mapping, usable as a resume point.
    pub fn values(&self) -> &ValueMap {
        &self.values
    }
}

impl<M> Iterator for ValueSteps<'_, M>
where
    M: PlanningModel + ?Sized,
{
    type Item = Result<ValueStep, PlanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.iteration >= self.config.max_iterations {
            return None;
        }

        let fresh = match backup(self.model, &self.values) {
            Ok(fresh) => fresh,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };

        self.iteration += 1;
        let l1_delta = l1_distance(&fresh, &self.values);
        let converged = l1_delta < self.config.tolerance;
        self.done = converged;
        self.values = fresh;

        Some(Ok(ValueStep {
            iteration: self.iteration,
            values: self.values.clone(),
            l1_delta,
            converged,
        }))
    }
}

fn backup<M>(model: &M, values: &ValueMap) -> Result<ValueMap, PlanError>
where
    M: PlanningModel + ?Sized,
{
    let discount = model.discount();
    let fresh = model
        .state_keys()
        .map(|state| {
            let (_, best) = greedy_action(model, state, values)?;
            Ok(model.reward(state) + discount * best)
        })
        .collect::<Result<Vec<_>, PlanError>>()?;

    Ok(ValueMap::from(fresh))
}
