use crate::error::Result;
use crate::grid::{Cell, Grid, Point};

use super::{Algorithm, PathResult, SolveState, Solver};

#[derive(Debug)]
struct Frame {
    point: Point,
    /// Index into `Point::neighbors` of the next direction to try
    next: usize,
}

/// Depth-first search that marks its way through the grid.
///
/// The grid doubles as the visited set: a FREE cell becomes HEAD when it is
/// entered and VISITED once every direction out of it failed, so it is never
/// entered twice. The explicit frame stack replaces recursion and can hold at
/// most one frame per free cell plus the start.
#[derive(Debug)]
pub struct Backtracker {
    start: Point,
    stack: Vec<Frame>,
    /// Cell to descend into on the next step
    enter: Option<Point>,
    state: SolveState,
}

impl Backtracker {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            stack: Vec::new(),
            enter: Some(start),
            state: SolveState::Searching,
        }
    }

    /// Current search depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn descend(&mut self, grid: &Grid, point: Point) -> Result<SolveState> {
        match grid.get(point.col, point.row)? {
            Cell::End => return self.unwind(grid, point),
            Cell::Free => grid.set(point.col, point.row, Cell::Head)?,
            _ => {}
        }
        self.stack.push(Frame { point, next: 0 });
        Ok(SolveState::Searching)
    }

    /// Mark every cell on the stack as PATH, innermost first
    fn unwind(&mut self, grid: &Grid, goal: Point) -> Result<SolveState> {
        let mut path = Vec::with_capacity(self.stack.len());
        while let Some(frame) = self.stack.pop() {
            let Point { col, row } = frame.point;
            if grid.get(col, row)? != Cell::Start {
                grid.set(col, row, Cell::Path)?;
                path.push(frame.point);
            }
        }
        path.reverse();

        self.state = SolveState::Solved(PathResult {
            path,
            start: self.start,
            goal,
        });
        Ok(self.state.clone())
    }
}

impl Solver for Backtracker {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Backtracking
    }

    fn start(&self) -> Point {
        self.start
    }

    fn step(&mut self, grid: &Grid) -> Result<SolveState> {
        if self.state.is_done() {
            return Ok(self.state.clone());
        }

        if let Some(point) = self.enter.take() {
            return self.descend(grid, point);
        }

        let Some(frame) = self.stack.last_mut() else {
            self.state = SolveState::NoPath;
            return Ok(self.state.clone());
        };

        let neighbors = frame.point.neighbors();
        while frame.next < neighbors.len() {
            let n = neighbors[frame.next];
            frame.next += 1;
            if grid.contains(n) && matches!(grid.get(n.col, n.row)?, Cell::Free | Cell::End) {
                self.enter = Some(n);
                return Ok(SolveState::Searching);
            }
        }

        // dead end
        let Point { col, row } = frame.point;
        self.stack.pop();
        if grid.get(col, row)? == Cell::Head {
            grid.set(col, row, Cell::Visited)?;
        }
        if self.stack.is_empty() {
            self.state = SolveState::NoPath;
        }

        Ok(self.state.clone())
    }

    fn state(&self) -> &SolveState {
        &self.state
    }
}
