use crate::{Cell, GridError, GridModel, GridSpec, TerminalSpec, TransitionSpec};

#[derive(Debug, Clone)]
/// Struct to build grid worlds in code
pub struct GridBuilder {
    spec: GridSpec,
}

impl GridBuilder {
    /// Start an empty `width` x `height` grid with deterministic moves,
    /// no living cost, and a discount of 1.
    pub fn new(width: usize, height: usize) -> Self {
        GridBuilder {
            spec: GridSpec {
                width,
                height,
                initial_value: 0.0,
                obstacles: Vec::new(),
                living_cost: 0.0,
                discount: 1.0,
                transition_distribution: TransitionSpec::deterministic(),
                terminals: Vec::new(),
            },
        }
    }

    pub fn initial_value(&mut self, value: f64) -> &mut Self {
        self.spec.initial_value = value;
        self
    }

    pub fn living_cost(&mut self, cost: f64) -> &mut Self {
        self.spec.living_cost = cost;
        self
    }

    pub fn discount(&mut self, discount: f64) -> &mut Self {
        self.spec.discount = discount;
        self
    }

    /// Set the forward/left/right/backward outcome weights.
    pub fn transitions(&mut self, forward: f64, left: f64, right: f64, backward: f64) -> &mut Self {
        self.spec.transition_distribution = TransitionSpec {
            forward,
            left,
            right,
            backward,
        };
        self
    }

    /// Block a cell
    pub fn obstacle(&mut self, row: usize, col: usize) -> &mut Self {
        self.spec.obstacles.push(Cell::new(row, col));
        self
    }

    /// Make a cell absorbing with the given reward
    pub fn terminal(&mut self, row: usize, col: usize, reward: f64) -> &mut Self {
        self.spec.terminals.push(TerminalSpec {
            state: Cell::new(row, col),
            reward,
        });
        self
    }

    pub fn build_spec(&self) -> Result<GridSpec, GridError> {
        self.spec.validate()?;
        Ok(self.spec.clone())
    }

    pub fn compile(&self, seed: u64) -> Result<GridModel, GridError> {
        self.spec.compile(seed)
    }
}
