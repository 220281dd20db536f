use std::{sync::Arc, thread, time::Duration};

use anyhow::{anyhow, Context};
use clap::Parser;
use egui::mutex::Mutex;
use log::{error, info};
use maze::{
    ActiveGrid, Coordinator, Grid, LoadOptions, Loader, Pace, PhaseReport, RunConfig, RunToken,
};

mod app;
mod args;
mod logging;

use app::{App, StatusLog};
use args::Args;

/// Pixels per cell when sizing the initial window
const CELL_PIXELS: usize = 42;
const MAX_WINDOW: usize = 640;

fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init(args.loglevel, args.logfile.as_deref()) {
        eprintln!("Could not set up logging: {e}");
    }

    if let Err(e) = run(&args) {
        error!("{e:#}");
        eprintln!("A critical error has occurred: {e:#}");
        std::process::exit(1);
    }
    println!("Application terminated. Goodbye!");
}

fn run(args: &Args) -> anyhow::Result<()> {
    if args.verbose >= 1 {
        println!(
            "maze-viewer {}: solving {}",
            env!("CARGO_PKG_VERSION"),
            args.maze.display()
        );
    }

    let grid = load(args)?;
    if args.verbose >= 2 {
        info!(
            "Loaded a {} x {} grid from {}.",
            grid.width(),
            grid.height(),
            args.maze.display()
        );
    }

    let config = RunConfig {
        step_delay: Duration::from_millis(args.delay),
        pace: Pace::from_millis(args.pace),
        ..Default::default()
    };
    let token = RunToken::new();
    let active = Arc::new(ActiveGrid::new(grid.clone()));

    if args.headless {
        return run_headless(grid, active, token, config);
    }

    let status: StatusLog = Arc::new(Mutex::new(Vec::new()));
    let coordinator = {
        let status = status.clone();
        Coordinator::new(grid, active.clone(), token.clone(), config).with_reporter(
            move |phase: &PhaseReport| {
                let line = format!("{}: {}", phase.algorithm, phase.status());
                println!("{}", phase.status());
                status.lock().push(line);
            },
        )
    };
    let solver = spawn_solver(coordinator, token.clone())?;

    let (width, height) = {
        let grid = active.load();
        (window_size(grid.width()), window_size(grid.height()))
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Maze")
            .with_inner_size([width, height]),
        ..Default::default()
    };

    let fps = args.fps;
    let ui_token = token.clone();
    let result = eframe::run_native(
        "Maze",
        options,
        Box::new(move |cc| Box::new(App::new(cc, active, ui_token, status, fps))),
    );

    println!("Shutting down.");
    token.stop();
    let solved = solver
        .join()
        .map_err(|_| anyhow!("the solver thread panicked"))?;

    result.map_err(|e| anyhow!("window error: {e}"))?;
    solved
}

fn load(args: &Args) -> anyhow::Result<Grid> {
    let options = LoadOptions {
        pedantic: args.pedantic(),
        wall_glyphs: args.wall_glyphs.chars().collect(),
    };
    let mut loader = Loader::new(options);
    let grid = loader
        .load_path(&args.maze)
        .with_context(|| format!("could not load {}", args.maze.display()))?;
    Ok(grid.with_verbose(args.verbose >= 3))
}

/// Run the coordinator on a background thread, its result comes back through
/// the join handle
fn spawn_solver(
    mut coordinator: Coordinator,
    token: RunToken,
) -> anyhow::Result<thread::JoinHandle<anyhow::Result<()>>> {
    let handle = thread::Builder::new()
        .name("solver".to_string())
        .spawn(move || {
            let report = coordinator.run().map_err(|e| {
                // nothing left to show, close the window
                token.stop();
                anyhow::Error::from(e)
            })?;
            if report.cancelled {
                info!("Solver stopped early.");
            }
            Ok(())
        })?;
    Ok(handle)
}

fn run_headless(
    grid: Grid,
    active: Arc<ActiveGrid>,
    token: RunToken,
    config: RunConfig,
) -> anyhow::Result<()> {
    let shown = active.clone();
    let mut coordinator =
        Coordinator::new(grid, active, token, config).with_reporter(move |phase: &PhaseReport| {
            println!("{}", shown.load_full());
            println!("{}", phase.status());
        });
    coordinator.run()?;
    Ok(())
}

fn window_size(cells: usize) -> f32 {
    MAX_WINDOW.min(cells * CELL_PIXELS) as f32
}
