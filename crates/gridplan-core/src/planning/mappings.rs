use std::ops::Index;

use crate::planning::{
    error::PlanError,
    ids::{ActionId, StateKey},
    model::PlanningModel,
};

/// Dense state → value mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMap(Vec<f64>);

impl ValueMap {
    /// Create a mapping of `len` states all holding `value`.
    pub fn filled(len: usize, value: f64) -> Self {
        ValueMap(vec![value; len])
    }

    pub fn zeros(len: usize) -> Self {
        Self::filled(len, 0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, state: StateKey) -> Option<f64> {
        self.0.get(state.index()).copied()
    }

    /// Iterate `(state, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (StateKey, f64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, value)| (StateKey::from(idx), *value))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub(crate) fn slot_mut(&mut self, state: StateKey) -> &mut f64 {
        &mut self.0[state.index()]
    }
}

impl From<Vec<f64>> for ValueMap {
    fn from(values: Vec<f64>) -> Self {
        ValueMap(values)
    }
}

impl Index<StateKey> for ValueMap {
    type Output = f64;

    fn index(&self, state: StateKey) -> &f64 {
        &self.0[state.index()]
    }
}

/// Dense state → action mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyMap(Vec<ActionId>);

impl PolicyMap {
    /// Create a policy choosing the same action slot in every state.
    pub fn uniform(len: usize, action: ActionId) -> Self {
        PolicyMap(vec![action; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, state: StateKey) -> Option<ActionId> {
        self.0.get(state.index()).copied()
    }

    /// Iterate `(state, action)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (StateKey, ActionId)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, action)| (StateKey::from(idx), *action))
    }

    pub(crate) fn set(&mut self, state: StateKey, action: ActionId) {
        self.0[state.index()] = action;
    }
}

impl From<Vec<ActionId>> for PolicyMap {
    fn from(actions: Vec<ActionId>) -> Self {
        PolicyMap(actions)
    }
}

impl Index<StateKey> for PolicyMap {
    type Output = ActionId;

    fn index(&self, state: StateKey) -> &ActionId {
        &self.0[state.index()]
    }
}

/// Check that a mapping of `len` entries covers exactly the model's states.
pub(crate) fn ensure_covers<M>(model: &M, len: usize) -> Result<(), PlanError>
where
    M: PlanningModel + ?Sized,
{
    let expected = model.state_count();
    if len != expected {
        return Err(PlanError::MappingLength {
            expected,
            found: len,
        });
    }
    Ok(())
}

/// Check that every policy entry names a legal action of its state.
pub(crate) fn ensure_legal<M>(model: &M, policy: &PolicyMap) -> Result<(), PlanError>
where
    M: PlanningModel + ?Sized,
{
    ensure_covers(model, policy.len())?;
    for (state, action) in policy.iter() {
        let num_actions = model.num_actions(state);
        if action.index() >= num_actions {
            return Err(PlanError::InvalidAction {
                state,
                action,
                num_actions,
            });
        }
    }
    Ok(())
}
