use serde::Serialize;

use crate::{Action, Cell, GridError};

/// What occupies a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Open,
    Terminal,
    Obstacle,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellSnapshot {
    pub cell: Cell,
    pub kind: CellKind,
    /// Committed value; absent for obstacles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Committed action; absent for obstacles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

/// Row-major copy of the committed mappings laid out over the whole grid.
#[derive(Debug, Clone, Serialize)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<CellSnapshot>,
}

impl GridSnapshot {
    pub fn cell(&self, cell: Cell) -> Option<&CellSnapshot> {
        if cell.row >= self.height || cell.col >= self.width {
            return None;
        }
        self.cells.get(cell.row * self.width + cell.col)
    }

    /// Iterate the snapshot one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[CellSnapshot]> + '_ {
        self.cells.chunks(self.width.max(1))
    }

    pub fn to_json(&self) -> Result<String, GridError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
