use arboard::Clipboard;
use env_logger::Env;
use ::glam::Vec3;
use gridwalk::config::Config;
use gridwalk::coords::{to_cell, to_position, Cell, FLOOR_OFFSET};
use gridwalk::{Agent, AgentState, Grid, NavError, ObstacleMap};
use macroquad::prelude::*;
use macroquad::window::Conf;
use std::sync::OnceLock;

static CONFIG: OnceLock<Config> = OnceLock::new();

fn config() -> &'static Config {
    CONFIG.get_or_init(Config::load)
}

/// RUST_LOG wins over the `[logging] level` from config.toml
fn init_logging() {
    let level = config().logging.level.as_str();
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .try_init()
        .ok();
}

/// Demo state: the board, one agent and what it has drawn so far
struct DemoState {
    grid: Grid,
    agent: Agent,
    trail: Vec<Vec3>,
    status: String,
    cell_size: f32,
}

impl DemoState {
    fn new(config: &Config) -> Self {
        let (grid, start) = match Grid::load_layout(&config.default_grid_file.path) {
            Ok(layout) => {
                log::info!(
                    "Loaded layout {} ({} obstacles)",
                    config.default_grid_file.path,
                    layout.grid.blocked_count()
                );
                (layout.grid, layout.start)
            }
            Err(e) => {
                log::warn!(
                    "Could not load {}: {}, using an empty {}x{} board",
                    config.default_grid_file.path,
                    e,
                    config.grid.cols,
                    config.grid.rows
                );
                (Grid::new(config.grid.cols, config.grid.rows), None)
            }
        };

        let start = start.unwrap_or(Cell::new(config.agent.start_x, config.agent.start_y));
        let agent = Agent::new(to_position(start), config.agent_config(), &grid);

        DemoState {
            grid,
            agent,
            trail: Vec::new(),
            status: "Left click: move".to_string(),
            cell_size: config.visual.cell_size,
        }
    }

    fn to_screen(&self, position: Vec3) -> (f32, f32) {
        (
            (position.x + 0.5) * self.cell_size,
            (position.z + 0.5) * self.cell_size,
        )
    }

    fn to_world(&self, mouse_x: f32, mouse_y: f32) -> Vec3 {
        Vec3::new(
            mouse_x / self.cell_size - 0.5,
            FLOOR_OFFSET,
            mouse_y / self.cell_size - 0.5,
        )
    }

    fn handle_click(&mut self, mouse_x: f32, mouse_y: f32) {
        let target = self.to_world(mouse_x, mouse_y);
        let cell = to_cell(target);

        // Left click: walk there
        if is_mouse_button_pressed(MouseButton::Left) {
            self.trail.clear();
            self.status = match self.agent.move_to_position(target) {
                Ok(()) => format!("Walking to {}", cell),
                Err(NavError::PathNotFound { .. }) => format!("No path to {}", cell),
                Err(e) => format!("Error: {}", e),
            };
        }
        // Right click: toggle obstacle
        else if is_mouse_button_pressed(MouseButton::Right) {
            if cell == to_cell(self.agent.position()) || !self.grid.in_bounds(cell) {
                return;
            }
            self.grid.toggle(cell);
            self.agent.set_obstacles(&self.grid);
            self.status = format!("Grid revision {}", self.grid.revision());
        }
    }

    fn update(&mut self, delta_time: f32) {
        let trail = &mut self.trail;
        let state = self
            .agent
            .update(delta_time, &mut |position: Vec3| trail.push(position));
        if state == AgentState::Idle && self.status.starts_with("Walking") {
            self.status = "Arrived".to_string();
        }
    }

    fn copy_to_clipboard(&self) {
        let layout = self.grid.to_layout();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(layout) {
                    log::warn!("Failed to copy to clipboard: {}", e);
                } else {
                    log::info!("Grid layout copied to clipboard");
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                log::warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn save_events(&self, path: &str) {
        let Some(events) = self.agent.events() else {
            log::info!("Event log disabled");
            return;
        };
        match events.save_to_file(path) {
            Ok(()) => log::info!("Saved event log to {}\n{}", path, events.summary()),
            Err(e) => log::warn!("Failed to save event log: {}", e),
        }
    }

    fn draw(&self, config: &Config) {
        let visual = &config.visual;
        clear_background(Color::from_rgba(
            visual.background_r,
            visual.background_g,
            visual.background_b,
            255,
        ));

        let cols = self.grid.cols().unwrap_or(0);
        let rows = self.grid.rows().unwrap_or(0);
        for y in 0..rows {
            for x in 0..cols {
                let px = x as f32 * self.cell_size;
                let py = y as f32 * self.cell_size;
                let color = if self.grid.is_blocked(Cell::new(x, y)) {
                    RED
                } else {
                    Color::from_rgba(60, 60, 60, 255)
                };
                draw_rectangle(px, py, self.cell_size - 1.0, self.cell_size - 1.0, color);
            }
        }

        if visual.show_path {
            if let Some(follow) = self.agent.follow() {
                let curve = follow.curve();
                let samples = 64;
                let mut previous = self.to_screen(curve.evaluate(0.0));
                for i in 1..=samples {
                    let next = self.to_screen(curve.evaluate(i as f32 / samples as f32));
                    draw_line(previous.0, previous.1, next.0, next.1, 2.0, YELLOW);
                    previous = next;
                }
                for &waypoint in curve.points() {
                    let (sx, sy) = self.to_screen(waypoint);
                    draw_circle(sx, sy, 3.0, ORANGE);
                }
            }

            for pair in self.trail.windows(2) {
                let (ax, ay) = self.to_screen(pair[0]);
                let (bx, by) = self.to_screen(pair[1]);
                draw_line(ax, ay, bx, by, 1.0, GREEN);
            }
        }

        let (ax, ay) = self.to_screen(self.agent.position());
        draw_circle(ax, ay, self.agent.config().radius * self.cell_size, BLUE);

        let info = format!(
            "{}\nLeft click: move  Right click: toggle obstacle\nC: copy grid  S: save event log  Esc: close",
            self.status
        );
        for (i, line) in info.lines().enumerate() {
            draw_text(line, 10.0, 20.0 + i as f32 * 20.0, 20.0, WHITE);
        }
    }
}

fn window_conf() -> Conf {
    init_logging();
    let config = config();
    let layout = Grid::load_layout(&config.default_grid_file.path).ok();
    let (cols, rows) = config.board_size(layout.as_ref().map(|layout| &layout.grid));
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: (cols.max(1) as f32 * config.visual.cell_size) as i32,
        window_height: (rows.max(1) as f32 * config.visual.cell_size) as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = config();
    let mut state = DemoState::new(config);

    loop {
        // Handle input
        if is_mouse_button_pressed(MouseButton::Left) || is_mouse_button_pressed(MouseButton::Right)
        {
            let (mouse_x, mouse_y) = mouse_position();
            state.handle_click(mouse_x, mouse_y);
        }

        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }

        if is_key_pressed(KeyCode::S) {
            state.save_events(&config.logging.event_log_path);
        }

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.update(get_frame_time());
        state.draw(config);

        next_frame().await
    }

    state.save_events(&config.logging.event_log_path);
}
