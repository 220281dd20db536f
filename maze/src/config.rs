use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::grid::Pace;

/// How grid sources are read and validated
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Reject unknown glyphs and wrong start/end counts instead of repairing them
    pub pedantic: bool,
    /// Characters read as walls
    pub wall_glyphs: Vec<char>,
}

impl LoadOptions {
    pub fn pedantic() -> Self {
        Self {
            pedantic: true,
            ..Default::default()
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            pedantic: false,
            wall_glyphs: vec!['#'],
        }
    }
}

/// Timing of a solver run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Pause before every unit of solver work
    pub step_delay: Duration,
    /// Pause before the first algorithm starts
    pub initial_delay: Duration,
    /// Pause between the two algorithms
    pub phase_pause: Duration,
    /// Settle delay around every cell write
    pub pace: Pace,
}

impl RunConfig {
    /// No pauses at all, used by tests and benchmarks
    pub fn instant() -> Self {
        Self {
            step_delay: Duration::ZERO,
            initial_delay: Duration::ZERO,
            phase_pause: Duration::ZERO,
            pace: Pace::NONE,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(200),
            initial_delay: Duration::from_secs(1),
            phase_pause: Duration::from_secs(5),
            pace: Pace::default(),
        }
    }
}
