use std::fmt::Display;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Axis, MazeError, Result};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Free = 0,
    Wall = 1,
    Start = 2,
    End = 3,
    Path = 4,
    Visited = 5,
    Head = 6,
}

impl Cell {
    pub const ALL: [Cell; 7] = [
        Cell::Free,
        Cell::Wall,
        Cell::Start,
        Cell::End,
        Cell::Path,
        Cell::Visited,
        Cell::Head,
    ];

    /// The display color of this cell as an RGB triple
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Cell::Free => (255, 255, 255),
            Cell::Wall => (0, 0, 0),
            Cell::Start => (0, 255, 0),
            Cell::End => (255, 0, 0),
            Cell::Path => (0, 0, 124),
            Cell::Visited => (255, 255, 197),
            Cell::Head => (0, 0, 255),
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Cell::Free => ' ',
            Cell::Wall => '#',
            Cell::Start => 'S',
            Cell::End => 'E',
            Cell::Path => '+',
            Cell::Visited => '.',
            Cell::Head => '@',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Cell::Free => "FREE",
            Cell::Wall => "WALL",
            Cell::Start => "START",
            Cell::End => "END",
            Cell::Path => "PATH",
            Cell::Visited => "VISITED",
            Cell::Head => "HEAD",
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = MazeError;

    fn try_from(value: u8) -> Result<Self> {
        Cell::ALL
            .get(value as usize)
            .copied()
            .ok_or(MazeError::InvalidCell(value))
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// A grid coordinate. Signed so that neighbors of border cells can be formed
/// and rejected by the bounds check instead of wrapping.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub col: isize,
    pub row: isize,
}

impl Point {
    pub fn new(col: isize, row: isize) -> Self {
        Self { col, row }
    }

    /// The four direct neighbors in the fixed search order: west, east, north, south
    pub fn neighbors(self) -> [Point; 4] {
        [
            Point::new(self.col - 1, self.row),
            Point::new(self.col + 1, self.row),
            Point::new(self.col, self.row - 1),
            Point::new(self.col, self.row + 1),
        ]
    }

    pub fn is_adjacent(self, other: Point) -> bool {
        (self.col - other.col).abs() + (self.row - other.row).abs() == 1
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Settle delay applied around every cell write so a concurrent renderer gets
/// to see transient states. 30% of the time is spent before the write, 70% after.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pace {
    pub millis: u64,
}

impl Pace {
    pub const NONE: Pace = Pace { millis: 0 };

    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub fn before(self) -> Duration {
        Duration::from_micros(self.millis.saturating_mul(300))
    }

    pub fn after(self) -> Duration {
        Duration::from_micros(self.millis.saturating_mul(700))
    }

    pub fn is_none(self) -> bool {
        self.millis == 0
    }
}

impl Default for Pace {
    fn default() -> Self {
        Self { millis: 10 }
    }
}

/// A rectangular grid of cells that one thread may write while others read.
///
/// Every cell is a single atomic byte, so readers always observe some value the
/// writer stored, never a torn one. No ordering is promised beyond that.
#[derive(Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Box<[AtomicU8]>,
    pace: Pace,
    verbose: bool,
}

impl Grid {
    pub fn new(width: usize, height: usize, fill: Cell) -> Self {
        Self {
            width,
            height,
            cells: (0..width * height).map(|_| AtomicU8::new(fill as u8)).collect(),
            pace: Pace::default(),
            verbose: false,
        }
    }

    /// Build a grid from rectangular rows of cells
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MazeError::Parse {
                message: "No maze cells found.".to_string(),
            });
        }
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(MazeError::Parse {
                message: format!(
                    "Row 1 contains {} fields, row {} contains {} fields.",
                    width,
                    r + 1,
                    row.len()
                ),
            });
        }

        let mut grid = Grid::new(width, height, Cell::Wall);
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                grid.cells[r * width + c] = AtomicU8::new(*cell as u8);
            }
        }
        Ok(grid)
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    /// Log every write at debug level
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        self.index(point.col, point.row).is_ok()
    }

    pub fn get(&self, col: isize, row: isize) -> Result<Cell> {
        let index = self.index(col, row)?;
        Cell::try_from(self.cells[index].load(Ordering::Relaxed))
    }

    /// Write a cell using the grid's own pace
    pub fn set(&self, col: isize, row: isize, value: Cell) -> Result<()> {
        self.set_paced(col, row, value, self.pace)
    }

    pub fn set_paced(&self, col: isize, row: isize, value: Cell, pace: Pace) -> Result<()> {
        let index = self.index(col, row)?;

        if !pace.is_none() {
            std::thread::sleep(pace.before());
        }
        if self.verbose {
            debug!(
                "Set field at (row={}, col={}) to {} (val={}).",
                row,
                col,
                value.name(),
                value as u8
            );
        }
        self.cells[index].store(value as u8, Ordering::Relaxed);
        if !pace.is_none() {
            std::thread::sleep(pace.after());
        }

        Ok(())
    }

    /// Write a raw cell code, rejecting anything outside the seven cell kinds
    pub fn set_raw(&self, col: isize, row: isize, value: u8) -> Result<()> {
        // bounds are reported before the value, like `set`
        self.index(col, row)?;
        self.set(col, row, Cell::try_from(value)?)
    }

    /// First cell of the given kind in row-major order
    pub fn find(&self, kind: Cell) -> Option<Point> {
        self.positions(kind).next()
    }

    pub fn positions(&self, kind: Cell) -> impl Iterator<Item = Point> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.load(Ordering::Relaxed) == kind as u8)
            .map(move |(i, _)| Point::new((i % width) as isize, (i / width) as isize))
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.positions(kind).count()
    }

    /// Copy the current cells out, row by row
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.load(row * self.width + col))
                    .collect()
            })
            .collect()
    }

    /// Create a per-cell side table with the same dimensions as this grid
    pub fn create_storage<T: Default + Clone>(&self) -> CellStorage<T> {
        CellStorage {
            width: self.width,
            cells: vec![T::default(); self.width * self.height],
        }
    }

    fn load(&self, index: usize) -> Cell {
        // only valid codes are ever stored
        Cell::try_from(self.cells[index].load(Ordering::Relaxed)).unwrap_or(Cell::Wall)
    }

    fn index(&self, col: isize, row: isize) -> Result<usize> {
        if row < 0 || row as usize >= self.height {
            return Err(MazeError::OutOfBounds {
                axis: Axis::Row,
                index: row,
                limit: self.height,
            });
        }
        if col < 0 || col as usize >= self.width {
            return Err(MazeError::OutOfBounds {
                axis: Axis::Column,
                index: col,
                limit: self.width,
            });
        }
        Ok(row as usize * self.width + col as usize)
    }
}

impl Default for Grid {
    /// The empty maze: a single wall
    fn default() -> Self {
        Grid::new(1, 1, Cell::Wall)
    }
}

impl Clone for Grid {
    /// Deep copy of the current cell values
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: self
                .cells
                .iter()
                .map(|c| AtomicU8::new(c.load(Ordering::Relaxed)))
                .collect(),
            pace: self.pace,
            verbose: self.verbose,
        }
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.rows() == other.rows()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A side table with one value per grid cell, stored in a single vec
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    width: usize,
    cells: Vec<T>,
}

impl<T> CellStorage<T> {
    pub fn get(&self, point: Point) -> Option<&T> {
        self.slot(point).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, point: Point) -> Option<&mut T> {
        self.slot(point).map(|i| &mut self.cells[i])
    }

    fn slot(&self, point: Point) -> Option<usize> {
        if point.col < 0 || point.row < 0 || point.col as usize >= self.width {
            return None;
        }
        let i = point.row as usize * self.width + point.col as usize;
        (i < self.cells.len()).then_some(i)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn create_basic_grid() -> Grid {
        use Cell::*;
        Grid::from_rows(&[
            vec![Wall, Wall, Wall, Wall, Wall],
            vec![Wall, Start, Free, Free, Wall],
            vec![Wall, Wall, Wall, End, Wall],
        ])
        .unwrap()
        .with_pace(Pace::NONE)
    }

    #[test]
    fn test_get_and_set() {
        let grid = create_basic_grid();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(1, 1).unwrap(), Cell::Start);

        grid.set(2, 1, Cell::Head).unwrap();
        assert_eq!(grid.get(2, 1).unwrap(), Cell::Head);
    }

    #[test]
    fn test_out_of_bounds_never_wraps() {
        let grid = create_basic_grid();

        assert!(matches!(
            grid.get(5, 0),
            Err(MazeError::OutOfBounds {
                axis: Axis::Column,
                index: 5,
                limit: 5
            })
        ));
        assert!(matches!(
            grid.get(0, -1),
            Err(MazeError::OutOfBounds {
                axis: Axis::Row,
                index: -1,
                ..
            })
        ));
        assert!(matches!(
            grid.set(5, 0, Cell::Free),
            Err(MazeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.set(0, -1, Cell::Free),
            Err(MazeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.get(0, 3),
            Err(MazeError::OutOfBounds { axis: Axis::Row, .. })
        ));
    }

    #[test]
    fn test_invalid_raw_cell() {
        let grid = create_basic_grid();

        assert!(matches!(grid.set_raw(2, 1, 7), Err(MazeError::InvalidCell(7))));
        assert_eq!(grid.get(2, 1).unwrap(), Cell::Free);

        grid.set_raw(2, 1, 5).unwrap();
        assert_eq!(grid.get(2, 1).unwrap(), Cell::Visited);
    }

    #[test]
    fn test_clone_is_deep() {
        let grid = create_basic_grid();
        let copy = grid.clone();

        grid.set(2, 1, Cell::Path).unwrap();
        assert_eq!(copy.get(2, 1).unwrap(), Cell::Free);
        assert_ne!(grid, copy);
    }

    #[test]
    fn test_default_is_single_wall() {
        let grid = Grid::default();
        assert_eq!((grid.width(), grid.height()), (1, 1));
        assert_eq!(grid.get(0, 0).unwrap(), Cell::Wall);
    }

    #[test]
    fn test_find_and_display() {
        let grid = create_basic_grid();
        assert_eq!(grid.find(Cell::Start), Some(Point::new(1, 1)));
        assert_eq!(grid.find(Cell::End), Some(Point::new(3, 2)));
        assert_eq!(grid.find(Cell::Head), None);
        assert_eq!(grid.to_string(), "#####\n#S  #\n###E#\n");
    }

    #[test]
    fn test_pace_split() {
        let pace = Pace::from_millis(10);
        assert_eq!(pace.before(), Duration::from_millis(3));
        assert_eq!(pace.after(), Duration::from_millis(7));
        assert!(Pace::NONE.is_none());
    }

    #[test]
    fn test_huge_pace_saturates() {
        let pace = Pace::from_millis(u64::MAX / 100);
        assert_eq!(pace.before(), Duration::from_micros(u64::MAX));
        assert_eq!(pace.after(), Duration::from_micros(u64::MAX));
    }

    #[test]
    fn test_storage_rejects_outside_points() {
        let grid = create_basic_grid();
        let mut storage = grid.create_storage::<Option<Point>>();

        *storage.get_mut(Point::new(4, 2)).unwrap() = Some(Point::new(3, 2));
        assert_eq!(storage.get(Point::new(4, 2)), Some(&Some(Point::new(3, 2))));
        assert!(storage.get(Point::new(5, 0)).is_none());
        assert!(storage.get(Point::new(0, 3)).is_none());
        assert!(storage.get(Point::new(-1, 0)).is_none());
    }
}
