use thiserror::Error;

pub type Result<T> = std::result::Result<T, MazeError>;

#[derive(Debug, Error)]
pub enum MazeError {
    /// Malformed source text (unknown glyph in pedantic mode, no cells at all).
    #[error("{message}")]
    Parse { message: String },

    /// A loaded grid breaks the start/end cardinality rules in pedantic mode.
    #[error("{message}")]
    Validation { message: String },

    #[error("{axis} index {index} is out of bounds (0 <= {axis} < {limit})")]
    OutOfBounds {
        axis: Axis,
        index: isize,
        limit: usize,
    },

    #[error("value {0} is not a valid maze cell (0-6)")]
    InvalidCell(u8),

    #[error("no START maze cell found")]
    MissingStart,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Axis::Row => "row",
                Axis::Column => "column",
            }
        )
    }
}
