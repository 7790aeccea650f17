use crate::planning::ids::{ActionId, StateKey};

/// One weighted successor of a state/action pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub prob: f64,
    pub next: StateKey,
}

impl Outcome {
    pub fn new(prob: f64, next: StateKey) -> Self {
        Outcome { prob, next }
    }
}

/// A finite MDP with a fully known transition model over dense state keys.
///
/// The solvers only query the model through this trait, so any domain that can
/// enumerate its states and list weighted successors can be planned over.
/// Implementations must uphold:
/// - every state has at least one legal action,
/// - every `Outcome::next` is a key below `state_count()`.
pub trait PlanningModel {
    /// Return the number of states; keys are `0..state_count()`.
    fn state_count(&self) -> usize;

    /// Return the discount factor applied to successor values.
    fn discount(&self) -> f64;

    /// Return the immediate reward collected in `state`.
    fn reward(&self, state: StateKey) -> f64;

    /// Return how many actions are legal in `state`.
    fn num_actions(&self, state: StateKey) -> usize;

    /// Return the weighted successors of taking `action` in `state`.
    /// Unknown state/action pairs yield an empty slice.
    fn outcomes(&self, state: StateKey, action: ActionId) -> &[Outcome];

    /// Iterate all state keys in ascending order.
    fn state_keys(&self) -> impl Iterator<Item = StateKey> + '_ {
        (0..self.state_count()).map(StateKey::from)
    }
}
