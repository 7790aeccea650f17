use std::collections::{HashMap, HashSet};

use gridplan_core::{ActionId, Outcome, PlanError, PlanningModel, PolicyMap, StateKey, ValueMap};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    Action, Cell, Direction, GridError, GridSpec, TransitionSpec,
    direction::{MOVES, TERMINAL_ACTIONS},
    snapshot::{CellKind, CellSnapshot, GridSnapshot},
};

#[derive(Debug, Clone)]
/// Compiled grid world.
///
/// The state space and transition tables are fixed at compile time. The model
/// also owns the committed value and policy mappings; solvers read them and
/// hand back fresh mappings, which only replace the committed ones through
/// `commit*`.
pub struct GridModel {
    width: usize,
    height: usize,
    initial_value: f64,
    living_cost: f64,
    discount: f64,
    transitions: TransitionSpec,
    cells: Vec<Cell>,
    cell_to_key: HashMap<Cell, StateKey>,
    terminal_rewards: Vec<Option<f64>>,
    outcomes: Vec<Vec<Vec<Outcome>>>,
    values: ValueMap,
    policy: PolicyMap,
    rng: ChaCha8Rng,
}

impl GridModel {
    /// Validate a `GridSpec` and compile it into a model.
    pub(crate) fn from_spec(spec: &GridSpec, seed: u64) -> Result<Self, GridError> {
        spec.validate()?;

        let obstacles: HashSet<Cell> = spec.obstacles.iter().copied().collect();
        let mut cells = Vec::with_capacity(spec.width * spec.height);
        let mut cell_to_key = HashMap::with_capacity(spec.width * spec.height);
        for row in 0..spec.height {
            for col in 0..spec.width {
                let cell = Cell::new(row, col);
                if obstacles.contains(&cell) {
                    continue;
                }
                cell_to_key.insert(cell, StateKey::from(cells.len()));
                cells.push(cell);
            }
        }

        let rewards: HashMap<Cell, f64> = spec
            .terminals
            .iter()
            .map(|terminal| (terminal.state, terminal.reward))
            .collect();
        let terminal_rewards = cells.iter().map(|cell| rewards.get(cell).copied()).collect();

        let state_count = cells.len();
        let mut model = GridModel {
            width: spec.width,
            height: spec.height,
            initial_value: spec.initial_value,
            living_cost: spec.living_cost,
            discount: spec.discount,
            transitions: spec.transition_distribution,
            cells,
            cell_to_key,
            terminal_rewards,
            outcomes: Vec::new(),
            values: ValueMap::filled(state_count, spec.initial_value),
            policy: PolicyMap::uniform(state_count, ActionId::from(0)),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };

        let outcomes = (0..state_count)
            .map(|idx| model.compile_outcomes(StateKey::from(idx)))
            .collect();
        model.outcomes = outcomes;
        model.policy = model.draw_policy();

        debug!(
            "compiled {}x{} grid: {} states, {} terminals, {} obstacles",
            model.width,
            model.height,
            state_count,
            rewards.len(),
            obstacles.len()
        );

        Ok(model)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn living_cost(&self) -> f64 {
        self.living_cost
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn transition_distribution(&self) -> TransitionSpec {
        self.transitions
    }

    /// All states in key order (row-major, obstacles skipped).
    pub fn states(&self) -> &[Cell] {
        &self.cells
    }

    pub fn state_key(&self, cell: Cell) -> Option<StateKey> {
        self.cell_to_key.get(&cell).copied()
    }

    pub fn cell(&self, key: StateKey) -> Option<Cell> {
        self.cells.get(key.index()).copied()
    }

    /// Check whether `cell` lies inside the grid rectangle.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    pub fn is_state(&self, cell: Cell) -> bool {
        self.cell_to_key.contains_key(&cell)
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.contains(cell) && !self.is_state(cell)
    }

    pub fn is_terminal(&self, cell: Cell) -> bool {
        self.state_key(cell)
            .is_some_and(|key| self.terminal_rewards[key.index()].is_some())
    }

    /// Terminal cells and their rewards, in key order.
    pub fn terminals(&self) -> impl Iterator<Item = (Cell, f64)> + '_ {
        self.cells
            .iter()
            .zip(&self.terminal_rewards)
            .filter_map(|(cell, reward)| reward.map(|reward| (*cell, reward)))
    }

    /// Terminal reward of `cell`, or the living cost for any other state.
    pub fn reward(&self, cell: Cell) -> Option<f64> {
        self.state_key(cell)
            .map(|key| self.terminal_rewards[key.index()].unwrap_or(self.living_cost))
    }

    /// The four moves for a non-terminal state, `[NoOp]` for a terminal.
    pub fn legal_actions(&self, cell: Cell) -> Option<&'static [Action]> {
        self.state_key(cell).map(|key| self.actions_of(key))
    }

    /// Weighted successors of taking `action` in `cell`.
    ///
    /// `NoOp` yields the single pair `(0.0, cell)`. A move yields four pairs in
    /// forward, left, right, backward order; a branch that would leave the
    /// state space keeps the agent in `cell`.
    pub fn transition_outcomes(&self, cell: Cell, action: Action) -> Option<Vec<(f64, Cell)>> {
        let key = self.state_key(cell)?;
        let pairs = self
            .outcomes_for(key, action)
            .into_iter()
            .map(|outcome| (outcome.prob, self.cells[outcome.next.index()]))
            .collect();
        Some(pairs)
    }

    /// Translate a policy slot of `key` into its grid action.
    pub fn action_for(&self, key: StateKey, action: ActionId) -> Option<Action> {
        if key.index() >= self.cells.len() {
            return None;
        }
        self.actions_of(key).get(action.index()).copied()
    }

    /// Translate a grid action into the policy slot of `key`.
    pub fn action_id(&self, key: StateKey, action: Action) -> Option<ActionId> {
        if key.index() >= self.cells.len() {
            return None;
        }
        self.actions_of(key)
            .iter()
            .position(|legal| *legal == action)
            .map(ActionId::from)
    }

    /// Committed value mapping.
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Committed policy mapping.
    pub fn policy(&self) -> &PolicyMap {
        &self.policy
    }

    pub fn value_at(&self, cell: Cell) -> Option<f64> {
        self.state_key(cell).and_then(|key| self.values.get(key))
    }

    pub fn action_at(&self, cell: Cell) -> Option<Action> {
        let key = self.state_key(cell)?;
        self.action_for(key, self.policy.get(key)?)
    }

    /// Replace the committed value mapping.
    pub fn commit_values(&mut self, values: ValueMap) -> Result<(), GridError> {
        self.check_values(&values)?;
        self.values = values;
        Ok(())
    }

    /// Replace the committed policy mapping.
    pub fn commit_policy(&mut self, policy: PolicyMap) -> Result<(), GridError> {
        self.check_policy(&policy)?;
        self.policy = policy;
        Ok(())
    }

    /// Replace both mappings; nothing is written unless both are valid.
    pub fn commit(&mut self, values: ValueMap, policy: PolicyMap) -> Result<(), GridError> {
        self.check_values(&values)?;
        self.check_policy(&policy)?;
        self.values = values;
        self.policy = policy;
        Ok(())
    }

    /// Restore every value to the initial value and draw a fresh random policy.
    pub fn reset(&mut self) {
        self.values = ValueMap::filled(self.cells.len(), self.initial_value);
        self.policy = self.draw_policy();
        debug!("reset {} states to {}", self.cells.len(), self.initial_value);
    }

    /// Row-major view of the whole grid for presentation layers.
    pub fn snapshot(&self) -> GridSnapshot {
        let mut cells = Vec::with_capacity(self.width * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = Cell::new(row, col);
                let kind = match self.state_key(cell) {
                    None => CellKind::Obstacle,
                    Some(key) if self.terminal_rewards[key.index()].is_some() => CellKind::Terminal,
                    Some(_) => CellKind::Open,
                };
                cells.push(CellSnapshot {
                    cell,
                    kind,
                    value: self.value_at(cell),
                    action: self.action_at(cell),
                });
            }
        }

        GridSnapshot {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    fn actions_of(&self, key: StateKey) -> &'static [Action] {
        if self.terminal_rewards[key.index()].is_some() {
            &TERMINAL_ACTIONS
        } else {
            &MOVES
        }
    }

    fn step(&self, from: StateKey, direction: Direction) -> StateKey {
        self.cells[from.index()]
            .offset(direction)
            .and_then(|next| self.cell_to_key.get(&next).copied())
            .unwrap_or(from)
    }

    fn outcomes_for(&self, from: StateKey, action: Action) -> Vec<Outcome> {
        let weights = self.transitions;
        match action {
            Action::NoOp => vec![Outcome::new(0.0, from)],
            Action::Move(direction) => vec![
                Outcome::new(weights.forward, self.step(from, direction)),
                Outcome::new(weights.left, self.step(from, direction.turn_left())),
                Outcome::new(weights.right, self.step(from, direction.turn_right())),
                Outcome::new(weights.backward, self.step(from, direction.reverse())),
            ],
        }
    }

    fn compile_outcomes(&self, key: StateKey) -> Vec<Vec<Outcome>> {
        self.actions_of(key)
            .iter()
            .map(|action| self.outcomes_for(key, *action))
            .collect()
    }

    fn draw_policy(&mut self) -> PolicyMap {
        let mut actions = Vec::with_capacity(self.cells.len());
        for idx in 0..self.cells.len() {
            let choices = self.actions_of(StateKey::from(idx)).len();
            actions.push(ActionId::from(self.rng.gen_range(0..choices)));
        }
        PolicyMap::from(actions)
    }

    fn check_values(&self, values: &ValueMap) -> Result<(), GridError> {
        if values.len() != self.cells.len() {
            return Err(PlanError::MappingLength {
                expected: self.cells.len(),
                found: values.len(),
            }
            .into());
        }
        Ok(())
    }

    fn check_policy(&self, policy: &PolicyMap) -> Result<(), GridError> {
        if policy.len() != self.cells.len() {
            return Err(PlanError::MappingLength {
                expected: self.cells.len(),
                found: policy.len(),
            }
            .into());
        }
        for (state, action) in policy.iter() {
            let num_actions = self.actions_of(state).len();
            if action.index() >= num_actions {
                return Err(PlanError::InvalidAction {
                    state,
                    action,
                    num_actions,
                }
                .into());
            }
        }
        Ok(())
    }
}

impl PlanningModel for GridModel {
    fn state_count(&self) -> usize {
        self.cells.len()
    }

    fn discount(&self) -> f64 {
        self.discount
    }

    fn reward(&self, state: StateKey) -> f64 {
        self.terminal_rewards
            .get(state.index())
            .copied()
            .flatten()
            .unwrap_or(self.living_cost)
    }

    fn num_actions(&self, state: StateKey) -> usize {
        self.outcomes.get(state.index()).map_or(0, Vec::len)
    }

    fn outcomes(&self, state: StateKey, action: ActionId) -> &[Outcome] {
        self.outcomes
            .get(state.index())
            .and_then(|actions| actions.get(action.index()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
