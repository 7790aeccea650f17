/// Dense index of a state inside a planning model.
/// Keys run from `0` to `state_count - 1` and double as mapping offsets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(usize);

impl StateKey {
    /// Return the underlying state index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for StateKey {
    fn from(value: usize) -> Self {
        StateKey(value)
    }
}

/// A wrapper for an index into the legal action list of one state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(usize);

impl ActionId {
    /// Return the position of this action in the state's action list.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ActionId {
    fn from(value: usize) -> Self {
        ActionId(value)
    }
}
