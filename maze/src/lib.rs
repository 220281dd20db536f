pub mod config;
pub mod coordinator;
pub mod error;
pub mod grid;
pub mod handle;
pub mod load;
pub mod solve;
pub mod token;

pub use config::{LoadOptions, RunConfig};
pub use coordinator::{Coordinator, PhaseReport, RunReport};
pub use error::{MazeError, Result};
pub use grid::{Cell, Grid, Pace, Point};
pub use handle::ActiveGrid;
pub use load::{load, parse, Loader};
pub use solve::{finish, solve, Algorithm, Backtracker, BreadthFirst, PathResult, SolveState, Solver};
pub use token::RunToken;
