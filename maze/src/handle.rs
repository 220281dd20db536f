use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::grid::Grid;

/// The grid instance a renderer should draw right now.
///
/// The coordinator swaps in a fresh grid for every phase; readers load the
/// current one wait-free and keep drawing the old instance until their guard
/// is dropped.
#[derive(Debug)]
pub struct ActiveGrid {
    inner: ArcSwap<Grid>,
}

impl ActiveGrid {
    pub fn new(grid: Grid) -> Self {
        Self {
            inner: ArcSwap::from_pointee(grid),
        }
    }

    /// Borrow the current grid for a short read, e.g. one frame
    pub fn load(&self) -> Guard<Arc<Grid>> {
        self.inner.load()
    }

    /// Take a reference to the current grid that outlives the next swap
    pub fn load_full(&self) -> Arc<Grid> {
        self.inner.load_full()
    }

    /// Atomically make `grid` the active instance
    pub fn store(&self, grid: Arc<Grid>) {
        self.inner.store(grid);
    }
}

impl Default for ActiveGrid {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}
