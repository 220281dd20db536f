use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "maze-viewer")]
#[command(about = "Watch a backtracking and a breadth-first search solve a maze")]
pub struct Args {
    /// Maze source: a text file, or an image (png, jpg, bmp, gif)
    #[arg(short, long, value_name = "PATH", default_value = "mazes/maze.txt")]
    pub maze: PathBuf,

    /// Pause between solver steps, in milliseconds
    #[arg(short, long, value_name = "MS", default_value = "200")]
    pub delay: u64,

    /// Settle time around every cell write, in milliseconds
    #[arg(long, value_name = "MS", default_value = "10")]
    pub pace: u64,

    /// Upper bound on frames drawn per second
    #[arg(long, value_name = "N", default_value = "60")]
    pub fps: u32,

    /// Reject unknown glyphs and require exactly one START
    #[arg(long)]
    pub pedantic: bool,

    /// Characters read as WALL in text mazes
    #[arg(long, value_name = "CHARS", default_value = "#")]
    pub wall_glyphs: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, value_name = "LEVEL", default_value = "warn")]
    pub loglevel: log::LevelFilter,

    /// Append log output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub logfile: Option<PathBuf>,

    /// Verbosity: -v banner, -vv grid details, -vvv pedantic loading and cell writes
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run both searches without a window and print the final grids
    #[arg(long)]
    pub headless: bool,
}

impl Args {
    pub fn pedantic(&self) -> bool {
        self.pedantic || self.verbose >= 3
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["maze-viewer"]);
        assert_eq!(args.maze, PathBuf::from("mazes/maze.txt"));
        assert_eq!(args.delay, 200);
        assert_eq!(args.pace, 10);
        assert_eq!(args.fps, 60);
        assert_eq!(args.loglevel, log::LevelFilter::Warn);
        assert!(!args.pedantic());
        assert!(!args.headless);
    }

    #[test]
    fn test_verbosity_turns_on_pedantic() {
        let args = Args::parse_from(["maze-viewer", "-vvv", "-m", "a.txt", "-l", "debug"]);
        assert_eq!(args.verbose, 3);
        assert!(args.pedantic());
        assert_eq!(args.loglevel, log::LevelFilter::Debug);
    }
}
