use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Cell, GridError, GridModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Serializable grid world configuration used for JSON/YAML IO and validation.
pub struct GridSpec {
    pub width: usize,
    pub height: usize,
    /// Starting value of every state, also restored by `reset`.
    pub initial_value: f64,
    /// Blocked cells, excluded from the state space.
    #[serde(default)]
    pub obstacles: Vec<Cell>,
    /// Reward collected in every non-terminal state.
    pub living_cost: f64,
    pub discount: f64,
    pub transition_distribution: TransitionSpec,
    /// Absorbing states and their rewards.
    #[serde(default)]
    pub terminals: Vec<TerminalSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Weights of the four actual moves relative to the intended direction.
///
/// The weights are used as given: they are not required to sum to 1 and are
/// never renormalised.
pub struct TransitionSpec {
    pub forward: f64,
    pub left: f64,
    pub right: f64,
    pub backward: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// A terminal cell and the reward it pays.
pub struct TerminalSpec {
    pub state: Cell,
    pub reward: f64,
}

impl TransitionSpec {
    /// Every action moves exactly where intended.
    pub fn deterministic() -> Self {
        TransitionSpec {
            forward: 1.0,
            left: 0.0,
            right: 0.0,
            backward: 0.0,
        }
    }

    /// Sum of the four weights.
    pub fn total(&self) -> f64 {
        self.forward + self.left + self.right + self.backward
    }

    fn components(&self) -> [(&'static str, f64); 4] {
        [
            ("forward", self.forward),
            ("left", self.left),
            ("right", self.right),
            ("backward", self.backward),
        ]
    }
}

impl GridSpec {
    /// Check whether `cell` lies inside the grid rectangle.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Validate geometry, terminal placement, and numeric ranges.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0 || self.height == 0 || self.width.checked_mul(self.height).is_none() {
            return Err(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        ensure_finite("initial_value", self.initial_value)?;
        ensure_finite("living_cost", self.living_cost)?;

        if !self.discount.is_finite() || self.discount <= 0.0 || self.discount > 1.0 {
            return Err(GridError::InvalidDiscount {
                value: self.discount,
            });
        }

        for (component, value) in self.transition_distribution.components() {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::InvalidTransitionWeight { component, value });
            }
        }

        let mut obstacles = HashSet::with_capacity(self.obstacles.len());
        for &cell in &self.obstacles {
            if !self.contains(cell) {
                return Err(GridError::ObstacleOutOfBounds {
                    cell,
                    width: self.width,
                    height: self.height,
                });
            }
            obstacles.insert(cell);
        }

        let mut terminals = HashSet::with_capacity(self.terminals.len());
        for terminal in &self.terminals {
            let cell = terminal.state;
            if !self.contains(cell) {
                return Err(GridError::TerminalOutOfBounds {
                    cell,
                    width: self.width,
                    height: self.height,
                });
            }
            if obstacles.contains(&cell) {
                return Err(GridError::TerminalOnObstacle { cell });
            }
            if !terminals.insert(cell) {
                return Err(GridError::DuplicateTerminal { cell });
            }
            ensure_finite(&format!("reward of terminal {cell}"), terminal.reward)?;
        }

        Ok(())
    }

    /// Validate and compile this spec, seeding the default-policy generator.
    pub fn compile(&self, seed: u64) -> Result<GridModel, GridError> {
        GridModel::from_spec(self, seed)
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<(), GridError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GridError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}
