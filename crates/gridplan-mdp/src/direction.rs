use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four unit moves on the grid.
///
/// The declaration order is the cyclic action order: turning right steps to
/// the next direction, turning left to the previous one, and reversing skips
/// two. Policy slots `0..4` of a non-terminal state follow the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Right,
    Up,
    Left,
}

impl Direction {
    /// All directions in cyclic action order.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Right,
        Direction::Up,
        Direction::Left,
    ];

    /// Position of this direction in [`Direction::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    fn from_cycle(index: usize) -> Direction {
        Direction::ALL[index % Direction::ALL.len()]
    }

    /// `(Δrow, Δcol)` displacement of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Previous direction in the cycle.
    pub fn turn_left(self) -> Direction {
        Direction::from_cycle(self.index() + Direction::ALL.len() - 1)
    }

    /// Next direction in the cycle.
    pub fn turn_right(self) -> Direction {
        Direction::from_cycle(self.index() + 1)
    }

    pub fn reverse(self) -> Direction {
        Direction::from_cycle(self.index() + 2)
    }

    pub fn arrow(self) -> char {
        match self {
            Direction::Down => '↓',
            Direction::Right => '→',
            Direction::Up => '↑',
            Direction::Left => '←',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Down => "down",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

/// An intended action: a move, or the single degenerate choice of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Move(Direction),
    NoOp,
}

/// Legal actions of every non-terminal state, in policy slot order.
pub(crate) const MOVES: [Action; 4] = [
    Action::Move(Direction::Down),
    Action::Move(Direction::Right),
    Action::Move(Direction::Up),
    Action::Move(Direction::Left),
];

/// Legal actions of a terminal state.
pub(crate) const TERMINAL_ACTIONS: [Action; 1] = [Action::NoOp];

impl Action {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::Move(direction) => Some(direction),
            Action::NoOp => None,
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Move(direction)
    }
}
