use gridplan_core::PlanError;
use thiserror::Error;

use crate::Cell;

#[derive(Debug, Error)]
/// Error type for grid loading, validation, compilation, and mapping commits.
pub enum GridError {
    #[error("failed to read or write grid file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported grid file extension for '{path}'; expected .json, .yaml or .yml")]
    UnsupportedFormat { path: String },

    #[error("grid dimensions must be positive and bounded, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("obstacle {cell} lies outside the {width}x{height} grid")]
    ObstacleOutOfBounds {
        cell: Cell,
        width: usize,
        height: usize,
    },

    #[error("terminal {cell} lies outside the {width}x{height} grid")]
    TerminalOutOfBounds {
        cell: Cell,
        width: usize,
        height: usize,
    },

    #[error("terminal {cell} is also an obstacle")]
    TerminalOnObstacle { cell: Cell },

    #[error("terminal {cell} is declared more than once")]
    DuplicateTerminal { cell: Cell },

    #[error("discount must lie in (0, 1], got {value}")]
    InvalidDiscount { value: f64 },

    #[error("transition weight '{component}' must be finite and >= 0, got {value}")]
    InvalidTransitionWeight { component: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: String, value: f64 },

    #[error(transparent)]
    Plan(#[from] PlanError),
}
