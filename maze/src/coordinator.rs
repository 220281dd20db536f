use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::config::RunConfig;
use crate::error::{MazeError, Result};
use crate::grid::{Cell, Grid, Point};
use crate::handle::ActiveGrid;
use crate::solve::{self, Algorithm, SolveState};
use crate::token::RunToken;

/// Outcome of one algorithm run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub algorithm: Algorithm,
    pub outcome: SolveState,
    pub steps: usize,
    pub elapsed: Duration,
}

impl PhaseReport {
    /// The status line shown to the user
    pub fn status(&self) -> &'static str {
        match self.outcome {
            SolveState::Solved(_) => "Solved",
            SolveState::NoPath => "No solution found",
            SolveState::Cancelled | SolveState::Searching => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub phases: Vec<PhaseReport>,
    /// The token was stopped before every phase completed
    pub cancelled: bool,
}

type Reporter = Box<dyn FnMut(&PhaseReport) + Send>;

/// Runs every algorithm in [`Algorithm::SEQUENCE`] on its own copy of the
/// loaded grid, publishing each copy through the active-grid handle.
pub struct Coordinator {
    original: Grid,
    active: Arc<ActiveGrid>,
    token: RunToken,
    config: RunConfig,
    reporter: Option<Reporter>,
}

impl Coordinator {
    pub fn new(original: Grid, active: Arc<ActiveGrid>, token: RunToken, config: RunConfig) -> Self {
        Self {
            original,
            active,
            token,
            config,
            reporter: None,
        }
    }

    /// Called after every phase that ran to completion
    pub fn with_reporter(mut self, reporter: impl FnMut(&PhaseReport) + Send + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// The START cell the solvers begin from, the first one in row-major order
    pub fn locate_start(&self) -> Result<Point> {
        let mut starts = self.original.positions(Cell::Start);
        let start = starts.next().ok_or(MazeError::MissingStart)?;
        let others = starts.count();
        if others > 0 {
            warn!(
                "Found {} START cells, starting from {}.",
                others + 1,
                start
            );
        }
        Ok(start)
    }

    pub fn run(&mut self) -> Result<RunReport> {
        let start = self.locate_start()?;
        let mut report = RunReport::default();

        for (i, algorithm) in Algorithm::SEQUENCE.into_iter().enumerate() {
            let pause = if i == 0 {
                self.config.initial_delay
            } else {
                self.config.phase_pause
            };
            if !self.token.sleep(pause) {
                report.cancelled = true;
                return Ok(report);
            }

            let grid = Arc::new(self.original.clone().with_pace(self.config.pace));
            self.active.store(grid.clone());

            let mut solver = algorithm.solver(start);
            info!("Running {} search from {}.", solver.algorithm(), solver.start());
            let timer = Instant::now();
            let (outcome, steps) =
                solve::finish(solver.as_mut(), &grid, &self.token, self.config.step_delay)?;

            if outcome == SolveState::Cancelled {
                info!("{} search cancelled after {} steps.", solver.algorithm(), steps);
                report.cancelled = true;
                return Ok(report);
            }

            let phase = PhaseReport {
                algorithm: solver.algorithm(),
                outcome,
                steps,
                elapsed: timer.elapsed(),
            };
            info!(
                "{} search finished: {} ({} steps, {:?}).",
                algorithm,
                phase.status(),
                steps,
                phase.elapsed
            );
            if let Some(reporter) = self.reporter.as_mut() {
                reporter(&phase);
            }
            report.phases.push(phase);
        }

        Ok(report)
    }
}
