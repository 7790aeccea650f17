mod builder;
mod cell;
mod direction;
mod error;
mod grid;
mod io;
mod snapshot;
mod spec;

pub use builder::GridBuilder;
pub use cell::Cell;
pub use direction::{Action, Direction};
pub use error::GridError;
pub use grid::GridModel;
pub use io::{compile_json, compile_yaml, load_json, load_spec, load_yaml, save_json, save_yaml};
pub use snapshot::{CellKind, CellSnapshot, GridSnapshot};
pub use spec::{GridSpec, TerminalSpec, TransitionSpec};
