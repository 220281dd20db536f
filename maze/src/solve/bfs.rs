use crate::error::Result;
use crate::grid::{Cell, CellStorage, Grid, Point};

use super::{Algorithm, PathResult, SolveState, Solver};

/// Level-by-level search. Every step expands one head of the current frontier;
/// cells discovered on the way go to the next frontier, so the first END
/// reached lies at minimal hop count.
#[derive(Debug)]
pub struct BreadthFirst {
    start: Point,
    frontier: Vec<Point>,
    /// Position of the next head to expand within `frontier`
    cursor: usize,
    next: Vec<Point>,
    /// Parent of every discovered cell. Created on the first step, when the
    /// grid dimensions are known.
    parents: Option<CellStorage<Option<Point>>>,
    state: SolveState,
}

impl BreadthFirst {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            frontier: vec![start],
            cursor: 0,
            next: Vec::new(),
            parents: None,
            state: SolveState::Searching,
        }
    }

    /// Heads of the round currently being expanded
    pub fn frontier(&self) -> &[Point] {
        &self.frontier
    }

    fn record(&mut self, child: Point, parent: Point) {
        if let Some(slot) = self.parents.as_mut().and_then(|p| p.get_mut(child)) {
            *slot = Some(parent);
        }
    }

    fn parent_of(&self, point: Point) -> Option<Point> {
        self.parents
            .as_ref()
            .and_then(|p| p.get(point))
            .copied()
            .flatten()
    }

    /// Walk the parent chain back from `goal`, marking every non-START cell as PATH
    fn trace(&mut self, grid: &Grid, goal: Point) -> Result<SolveState> {
        let mut path = Vec::new();
        let mut current = goal;
        while current != self.start {
            let Some(parent) = self.parent_of(current) else {
                break;
            };
            current = parent;
            if grid.get(current.col, current.row)? != Cell::Start {
                grid.set(current.col, current.row, Cell::Path)?;
                path.push(current);
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

impl Solver for BreadthFirst {
    fn algorithm(&self) -> Algorithm {
        Algorithm::BreadthFirst
    }

    fn start(&self) -> Point {
        self.start
    }

    fn step(&mut self, grid: &Grid) -> Result<SolveState> {
        if self.state.is_done() {
            return Ok(self.state.clone());
        }

        if self.parents.is_none() {
            if grid.get(self.start.col, self.start.row)? == Cell::End {
                self.state = SolveState::Solved(PathResult {
                    path: Vec::new(),
                    start: self.start,
                    goal: self.start,
                });
                return Ok(self.state.clone());
            }
            self.parents = Some(grid.create_storage());
        }

        if self.cursor >= self.frontier.len() {
            self.frontier = std::mem::take(&mut self.next);
            self.cursor = 0;
            if self.frontier.is_empty() {
                self.state = SolveState::NoPath;
                return Ok(self.state.clone());
            }
        }

        let head = self.frontier[self.cursor];
        self.cursor += 1;

        if grid.get(head.col, head.row)? == Cell::Head {
            grid.set(head.col, head.row, Cell::Visited)?;
        }

        for n in head.neighbors() {
            if !grid.contains(n) {
                continue;
            }
            match grid.get(n.col, n.row)? {
                Cell::End => {
                    self.record(n, head);
                    return self.trace(grid, n);
                }
                Cell::Free => {
                    grid.set(n.col, n.row, Cell::Head)?;
                    self.record(n, head);
                    self.next.push(n);
                }
                _ => {}
            }
        }

        Ok(SolveState::Searching)
    }

    fn state(&self) -> &SolveState {
        &self.state
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::solve::finish;
    use crate::solve::test_util::{cells_of, grid};
    use crate::token::RunToken;
    use std::time::Duration;

    fn run(grid: &Grid) -> SolveState {
        let mut solver = BreadthFirst::new(grid.find(Cell::Start).unwrap());
        finish(&mut solver, grid, &RunToken::new(), Duration::ZERO)
            .unwrap()
            .0
    }

    #[test]
    fn test_single_corridor() {
        let grid = grid("S E");
        let state = run(&grid);

        assert!(state.is_solved());
        assert_eq!(cells_of(&grid, Cell::Path), vec![(1, 0)]);
        assert_eq!(grid.get(2, 0).unwrap(), Cell::End);
    }

    #[test]
    fn test_walled_off() {
        let grid = grid("S#\n#E");
        assert_eq!(run(&grid), SolveState::NoPath);
        assert_eq!(grid.to_string(), "S#\n#E\n");
    }

    #[test]
    fn test_shortest_path() {
        // the backtracker goes east first, breadth-first takes the two moves south
        let grid = grid("S   \n    \nE   ");
        let SolveState::Solved(result) = run(&grid) else {
            panic!("expected a path");
        };

        assert_eq!(result.path, vec![Point::new(0, 1)]);
        assert_eq!(result.hops(), 2);
        assert_eq!(cells_of(&grid, Cell::Path), vec![(0, 1)]);
    }

    #[test]
    fn test_levels_are_expanded_in_order() {
        let grid = grid("     \n  S  \n     \n####E");
        let mut solver = BreadthFirst::new(Point::new(2, 1));

        // first round: only the start, which discovers its four neighbors
        solver.step(&grid).unwrap();
        assert_eq!(
            cells_of(&grid, Cell::Head),
            vec![(2, 0), (1, 1), (3, 1), (2, 2)]
        );

        // second round begins with the west neighbor, discovered first
        solver.step(&grid).unwrap();
        assert_eq!(solver.frontier()[0], Point::new(1, 1));
        assert_eq!(grid.get(1, 1).unwrap(), Cell::Visited);

        let (state, _) = finish(&mut solver, &grid, &RunToken::new(), Duration::ZERO).unwrap();
        let SolveState::Solved(result) = state else {
            panic!("expected a path");
        };
        assert_eq!(result.hops(), 4);
        assert_eq!(result.goal, Point::new(4, 3));
    }

    #[test]
    fn test_no_path_marks_reachable_cells_visited() {
        let grid = grid("S  #E\n  ## ");
        assert_eq!(run(&grid), SolveState::NoPath);

        assert_eq!(grid.count(Cell::Visited), 4);
        assert_eq!(grid.count(Cell::Head), 0);
        assert_eq!(grid.count(Cell::Path), 0);
        assert_eq!(grid.get(4, 1).unwrap(), Cell::Free);
    }

    #[test]
    fn test_cancel_mid_search_stops_mutating() {
        let grid = grid("S     E");
        let mut solver = BreadthFirst::new(Point::new(0, 0));
        for _ in 0..3 {
            solver.step(&grid).unwrap();
        }
        assert_eq!(solver.frontier(), &[Point::new(2, 0)]);

        let token = RunToken::new();
        token.stop();
        let snapshot = grid.clone();
        let (state, steps) = finish(&mut solver, &grid, &token, Duration::ZERO).unwrap();

        assert_eq!(state, SolveState::Cancelled);
        assert_eq!(steps, 0);
        assert_eq!(grid, snapshot);
        assert_eq!(cells_of(&grid, Cell::Visited), vec![(1, 0), (2, 0)]);
        assert_eq!(cells_of(&grid, Cell::Head), vec![(3, 0)]);
    }

    #[test]
    fn test_start_on_end() {
        let grid = grid("E  ");
        let mut solver = BreadthFirst::new(Point::new(0, 0));
        let state = solver.step(&grid).unwrap();

        assert!(state.is_solved());
        assert_eq!(grid.count(Cell::Path), 0);
    }

    #[test]
    fn test_out_of_bounds_start_is_an_error() {
        let grid = grid("S E");
        let mut solver = BreadthFirst::new(Point::new(7, 0));
        assert!(solver.step(&grid).is_err());
    }
}
