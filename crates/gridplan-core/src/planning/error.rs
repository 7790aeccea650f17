use std::fmt;

use crate::planning::ids::{ActionId, StateKey};

/// Error type for Bellman backups, policy extraction, and solver runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A value or policy mapping does not cover exactly the model's states.
    MappingLength { expected: usize, found: usize },
    /// A policy selected an action outside `[0, num_actions)` for a state.
    InvalidAction {
        state: StateKey,
        action: ActionId,
        num_actions: usize,
    },
    /// The model reported a state without any legal action.
    NoActions { state: StateKey },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::MappingLength { expected, found } => write!(
                f,
                "mapping covers {found} states but the model has {expected}"
            ),
            PlanError::InvalidAction {
                state,
                action,
                num_actions,
            } => write!(
                f,
                "policy selected invalid action {} for state {} with {} actions",
                action.index(),
                state.index(),
                num_actions
            ),
            PlanError::NoActions { state } => {
                write!(f, "state {} has no legal actions", state.index())
            }
        }
    }
}

impl std::error::Error for PlanError {}
