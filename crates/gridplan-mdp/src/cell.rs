use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Direction;

/// A grid coordinate, serialized as `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// Neighbouring coordinate one step in `direction`, if it is non-negative.
    /// Grid bounds and obstacles are the model's concern.
    pub fn offset(self, direction: Direction) -> Option<Cell> {
        let (d_row, d_col) = direction.delta();
        Some(Cell {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl From<[usize; 2]> for Cell {
    fn from([row, col]: [usize; 2]) -> Self {
        Cell { row, col }
    }
}

impl From<Cell> for [usize; 2] {
    fn from(cell: Cell) -> Self {
        [cell.row, cell.col]
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
