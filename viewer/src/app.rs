use std::{sync::Arc, time::Duration};

use eframe::glow;
use egui::{mutex::Mutex, Color32, Pos2, Rect, Sense, Stroke, Vec2};
use maze::{ActiveGrid, Cell, RunToken};

/// Smallest gap kept between the maze and the window edge, in points
const MIN_OFFSET: f32 = 5.0;
const BACKGROUND: Color32 = Color32::GRAY;

/// Status lines shared with the solver thread
pub type StatusLog = Arc<Mutex<Vec<String>>>;

pub struct App {
    grid: Arc<ActiveGrid>,
    token: RunToken,
    status: StatusLog,
    frame_time: Duration,
    state: State,
}

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(Default, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct State {
    draw_grid_lines: bool,
}

impl App {
    /// Called once before the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        grid: Arc<ActiveGrid>,
        token: RunToken,
        status: StatusLog,
        fps: u32,
    ) -> Self {
        // Load previous app state (if any).
        let state: State = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };

        App {
            grid,
            token,
            status,
            frame_time: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            state,
        }
    }

    fn paint_grid(&self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        // a single snapshot for the whole frame, the solver may swap grids meanwhile
        let grid = self.grid.load();
        let Some((origin, size)) = layout(rect, grid.width(), grid.height()) else {
            return;
        };

        for (row, cells) in grid.rows().iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let min = origin + Vec2::new(col as f32 * size, row as f32 * size);
                let cell_rect = Rect::from_min_size(min, Vec2::splat(size));
                painter.rect_filled(cell_rect, 0.0, color(*cell));
                if self.state.draw_grid_lines {
                    painter.rect_stroke(cell_rect, 0.0, Stroke::new(1.0, Color32::DARK_GRAY));
                }
            }
        }
    }
}

fn color(cell: Cell) -> Color32 {
    let (r, g, b) = cell.rgb();
    Color32::from_rgb(r, g, b)
}

/// Top-left corner and side length of square cells, centered in `area` with
/// at least [`MIN_OFFSET`] on every side. `None` when nothing fits.
fn layout(area: Rect, columns: usize, rows: usize) -> Option<(Pos2, f32)> {
    if columns == 0 || rows == 0 {
        return None;
    }
    let usable = area.size() - Vec2::splat(2.0 * MIN_OFFSET);
    let size = (usable.x / columns as f32).min(usable.y / rows as f32).floor();
    if size < 1.0 {
        return None;
    }
    let used = Vec2::new(columns as f32 * size, rows as f32 * size);
    Some((area.center() - used / 2.0, size))
}

impl eframe::App for App {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.state);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.token.stop();
        } else if !self.token.is_running() {
            // the solver thread gave up
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        self.token.stop();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        egui::SidePanel::left("side_panel").show(ctx, |ui| {
            let grid = self.grid.load();
            ui.label(format!("Maze: {} x {}", grid.width(), grid.height()));
            ui.checkbox(&mut self.state.draw_grid_lines, "Draw grid lines");
            ui.separator();

            for line in self.status.lock().iter() {
                ui.label(line);
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                egui::warn_if_debug_build(ui);
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| self.paint_grid(ui));

        ctx.request_repaint_after(self.frame_time);
    }

    fn on_exit(&mut self, _gl: Option<&glow::Context>) {
        self.token.stop();
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_layout_centers_square_cells() {
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(110.0, 60.0));
        let (origin, size) = layout(area, 5, 5).unwrap();

        // height is the limiting axis: (60 - 10) / 5
        assert_eq!(size, 10.0);
        assert_eq!(origin, Pos2::new(30.0, 5.0));
    }

    #[test]
    fn test_layout_too_small() {
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(12.0, 12.0));
        assert!(layout(area, 5, 5).is_none());
        assert!(layout(area, 0, 5).is_none());
    }

    #[test]
    fn test_colors() {
        assert_eq!(color(Cell::Wall), Color32::BLACK);
        assert_eq!(color(Cell::Path), Color32::from_rgb(0, 0, 124));
    }
}
