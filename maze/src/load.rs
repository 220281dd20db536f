use std::path::Path;

use image::{DynamicImage, GenericImageView};
use log::{error, warn};

use crate::config::LoadOptions;
use crate::error::{MazeError, Result};
use crate::grid::{Cell, Grid, Pace};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Reads grid sources, collecting the warnings produced in lenient mode
#[derive(Debug, Default)]
pub struct Loader {
    options: LoadOptions,
    source_name: Option<String>,
    warnings: Vec<String>,
}

impl Loader {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            source_name: None,
            warnings: Vec::new(),
        }
    }

    /// Name used in error and warning messages
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Load a text or image file, chosen by extension
    pub fn load_path(&mut self, path: &Path) -> Result<Grid> {
        if self.source_name.is_none() {
            self.source_name = Some(path.display().to_string());
        }

        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);

        if is_image {
            let img = image::open(path)?;
            self.parse_img(&img)
        } else {
            let text = std::fs::read_to_string(path)?;
            self.parse_str(&text)
        }
    }

    /// Parse the text format: one row per line, one cell per printable character
    pub fn parse_str(&mut self, text: &str) -> Result<Grid> {
        let mut rows = Vec::new();
        let walls = self.options.wall_glyphs.clone();

        for (r, line) in text.lines().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars().filter(|c| is_printable(*c, &walls)) {
                let cell = match ch {
                    ' ' => Cell::Free,
                    'S' => Cell::Start,
                    'E' => Cell::End,
                    c if self.options.wall_glyphs.contains(&c) => Cell::Wall,
                    c => {
                        let msg = format!(
                            "Unknown maze character: \"{}\"; Use Space, {}, S or E.{}",
                            c,
                            self.wall_glyph_list(),
                            self.location(Some(r + 1), Some(row.len() + 1))
                        );
                        if self.options.pedantic {
                            error!("{}", msg);
                            return Err(MazeError::Parse { message: msg });
                        }
                        warn!("{}", msg);
                        self.warnings.push(msg);
                        Cell::Free
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }

        self.finish(rows)
    }

    /// Threshold an image: start/end colors become markers, dark pixels walls
    pub fn parse_img(&mut self, img: &DynamicImage) -> Result<Grid> {
        let width = img.width() as usize;
        let height = img.height() as usize;

        let mut rows = vec![vec![Cell::Wall; width]; height];

        for (row, cells) in rows.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                let p = img.get_pixel(col as u32, row as u32);
                let [r, g, b, _] = p.0;

                *cell = if g >= 200 && r < 100 && b < 100 {
                    Cell::Start
                } else if r >= 200 && g < 100 && b < 100 {
                    Cell::End
                } else if r < 128 {
                    Cell::Wall
                } else {
                    Cell::Free
                }
            }
        }

        self.finish(rows)
    }

    fn finish(&mut self, mut rows: Vec<Vec<Cell>>) -> Result<Grid> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            let msg = format!("No maze cells found.{}", self.location(None, None));
            error!("{}", msg);
            return Err(MazeError::Parse { message: msg });
        }

        for (r, row) in rows.iter_mut().enumerate() {
            if row.len() < width {
                let msg = format!(
                    "Row {} has {} of {} fields, padding with walls.{}",
                    r + 1,
                    row.len(),
                    width,
                    self.location(Some(r + 1), None)
                );
                warn!("{}", msg);
                self.warnings.push(msg);
                row.resize(width, Cell::Wall);
            }
        }

        let grid = Grid::from_rows(&rows)?;
        self.check_markers(&grid)?;
        Ok(grid)
    }

    fn check_markers(&mut self, grid: &Grid) -> Result<()> {
        let starts = grid.count(Cell::Start);
        let ends = grid.count(Cell::End);

        if self.options.pedantic {
            if starts != 1 {
                return Err(self.invalid(format!(
                    "Expected exactly one START cell, found {}.",
                    starts
                )));
            }
            if ends == 0 {
                return Err(self.invalid("Expected at least one END cell, found none.".into()));
            }
            return Ok(());
        }

        let (width, height) = (grid.width(), grid.height());
        if starts == 0 && ends == 0 && width >= 3 && height >= 3 && width + height > 7 {
            let (sc, sr) = (1, 1);
            let (ec, er) = (width as isize - 2, height as isize - 2);
            if grid.get(sc, sr)? == Cell::Free && grid.get(ec, er)? == Cell::Free {
                grid.set_paced(sc, sr, Cell::Start, Pace::NONE)?;
                grid.set_paced(ec, er, Cell::End, Pace::NONE)?;
                self.warn(format!(
                    "No START or END cell, placed START at ({}, {}) and END at ({}, {}).",
                    sc, sr, ec, er
                ));
                return Ok(());
            }
        }

        if starts == 0 {
            self.warn("No START cell found.".into());
        } else if starts > 1 {
            self.warn(format!("Found {} START cells, the first one is used.", starts));
        }
        if ends == 0 {
            self.warn("No END cell found.".into());
        }
        Ok(())
    }

    fn invalid(&self, message: String) -> MazeError {
        let message = format!("{}{}", message, self.location(None, None));
        error!("{}", message);
        MazeError::Validation { message }
    }

    fn warn(&mut self, message: String) {
        let message = format!("{}{}", message, self.location(None, None));
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn wall_glyph_list(&self) -> String {
        self.options
            .wall_glyphs
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn location(&self, row: Option<usize>, col: Option<usize>) -> String {
        let mut info = format!(" (In {}", self.source_name.as_deref().unwrap_or("N/A"));
        if row.is_some() || col.is_some() {
            let show = |v: Option<usize>| v.map_or("N/A".to_string(), |v| v.to_string());
            info += &format!(", row={}, column={}", show(row), show(col));
        }
        info += ")";
        info
    }
}

/// Printable ASCII plus the configured wall glyphs. Anything else (control
/// codes, a byte order mark, other invisible characters) takes no column.
fn is_printable(c: char, walls: &[char]) -> bool {
    c == ' ' || c.is_ascii_graphic() || walls.contains(&c)
}

/// Load a grid file with the given options
pub fn load(path: &Path, options: LoadOptions) -> Result<Grid> {
    Loader::new(options).load_path(path)
}

/// Parse grid text with the given options
pub fn parse(text: &str, options: LoadOptions) -> Result<Grid> {
    Loader::new(options).parse_str(text)
}
