//! Step-driven maze solvers.
//!
//! A solver owns no grid. It is handed the active grid on every [`Solver::step`],
//! performs one unit of work on it and reports whether it is still searching.
//! The driver between steps is where cancellation and pacing happen.

mod backtrack;
mod bfs;

use std::fmt::Display;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use backtrack::Backtracker;
pub use bfs::BreadthFirst;

use crate::error::Result;
use crate::grid::{Grid, Point};
use crate::token::RunToken;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult {
    /// Cells marked PATH, ordered from the start side to the goal side
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
}

impl PathResult {
    /// Number of moves from start to goal
    pub fn hops(&self) -> usize {
        if self.start == self.goal {
            0
        } else {
            self.path.len() + 1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveState {
    Searching,
    NoPath,
    Solved(PathResult),
    /// The run token was stopped before the search finished
    Cancelled,
}

impl SolveState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SolveState::Searching)
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveState::Solved(_))
    }
}

pub trait Solver {
    fn algorithm(&self) -> Algorithm;

    fn start(&self) -> Point;

    /// Perform one unit of work on `grid`
    fn step(&mut self, grid: &Grid) -> Result<SolveState>;

    fn state(&self) -> &SolveState;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Algorithm {
    Backtracking,
    BreadthFirst,
}

impl Algorithm {
    /// The order in which a run executes the algorithms
    pub const SEQUENCE: [Algorithm; 2] = [Algorithm::Backtracking, Algorithm::BreadthFirst];

    pub fn solver(self, start: Point) -> Box<dyn Solver + Send> {
        match self {
            Algorithm::Backtracking => Box::new(Backtracker::new(start)),
            Algorithm::BreadthFirst => Box::new(BreadthFirst::new(start)),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Algorithm::Backtracking => "backtracking",
                Algorithm::BreadthFirst => "breadth-first",
            }
        )
    }
}

/// Step `solver` until it is done, checking `token` and sleeping `step_delay`
/// before every step. Returns the final state and the number of steps taken.
/// A solver that is already done is returned as is, without touching `grid`.
pub fn finish<S: Solver + ?Sized>(
    solver: &mut S,
    grid: &Grid,
    token: &RunToken,
    step_delay: Duration,
) -> Result<(SolveState, usize)> {
    if solver.state().is_done() {
        return Ok((solver.state().clone(), 0));
    }
    let mut steps = 0;
    loop {
        if !token.is_running() || !token.sleep(step_delay) {
            return Ok((SolveState::Cancelled, steps));
        }
        steps += 1;
        match solver.step(grid)? {
            SolveState::Searching => {}
            s => return Ok((s, steps)),
        }
    }
}

/// Run `algorithm` from `start` to completion without pauses.
/// True iff an END cell was reached.
pub fn solve(algorithm: Algorithm, grid: &Grid, start: Point, token: &RunToken) -> Result<bool> {
    let mut solver = algorithm.solver(start);
    let (state, _) = finish(solver.as_mut(), grid, token, Duration::ZERO)?;
    Ok(state.is_solved())
}


#[cfg(test)]
mod test {

    use super::test_util::grid;
    use super::*;
    use crate::grid::Cell;

    #[test]
    fn test_solve_both_algorithms() {
        for algorithm in Algorithm::SEQUENCE {
            let grid = grid("S E");
            let start = grid.find(Cell::Start).unwrap();
            assert!(solve(algorithm, &grid, start, &RunToken::new()).unwrap());
            assert_eq!(grid.get(1, 0).unwrap(), Cell::Path, "{}", algorithm);
        }
    }

    #[test]
    fn test_stopped_token_does_no_work() {
        for algorithm in Algorithm::SEQUENCE {
            let grid = grid("S  E");
            let before = grid.clone();
            let token = RunToken::new();
            token.stop();

            let mut solver = algorithm.solver(Point::new(0, 0));
            let (state, steps) =
                finish(solver.as_mut(), &grid, &token, Duration::ZERO).unwrap();

            assert_eq!(state, SolveState::Cancelled);
            assert_eq!(steps, 0);
            assert_eq!(grid, before);
        }
    }

    #[test]
    fn test_finished_solver_is_not_stepped_again() {
        for algorithm in Algorithm::SEQUENCE {
            let grid = grid("S E");
            let mut solver = algorithm.solver(Point::new(0, 0));
            assert_eq!(solver.algorithm(), algorithm);
            assert_eq!(solver.start(), Point::new(0, 0));

            let (first, _) =
                finish(solver.as_mut(), &grid, &RunToken::new(), Duration::ZERO).unwrap();
            assert!(first.is_solved());
            assert_eq!(solver.state(), &first);

            let after = grid.clone();
            let (again, steps) =
                finish(solver.as_mut(), &grid, &RunToken::new(), Duration::ZERO).unwrap();
            assert_eq!(again, first);
            assert_eq!(steps, 0);
            assert_eq!(grid, after);
        }
    }

    #[test]
    fn test_hops() {
        let result = PathResult {
            path: vec![Point::new(1, 0)],
            start: Point::new(0, 0),
            goal: Point::new(2, 0),
        };
        assert_eq!(result.hops(), 2);
    }
}
