use crate::agent::AgentConfig;
use crate::error::NavError;
use crate::grid::Grid;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub obstacles: ObstacleConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub default_grid_file: DefaultGridFileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default = "default_rows")]
    pub rows: i32,
}

#[derive(Debug, Deserialize)]
pub struct AgentSection {
    #[serde(default = "default_agent_speed")]
    pub speed: f32,
    #[serde(default = "default_agent_radius")]
    pub radius: f32,
    #[serde(default = "default_start_x")]
    pub start_x: i32,
    #[serde(default = "default_start_y")]
    pub start_y: i32,
}

#[derive(Debug, Deserialize)]
pub struct ObstacleConfig {
    /// Radius of the circle around each obstacle center; sqrt(0.5) covers a unit cell
    #[serde(default = "default_obstacle_radius")]
    pub radius: f32,
}

#[derive(Debug, Deserialize)]
pub struct SmoothingConfig {
    #[serde(default = "default_smoothing_enabled")]
    pub enabled: bool,
    #[serde(default = "default_step_size")]
    pub step_size: f32,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_show_path")]
    pub show_path: bool,
}

#[derive(Debug, Deserialize)]
pub struct DefaultGridFileConfig {
    #[serde(default = "default_grid_file_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_enable_event_log")]
    pub enable_event_log: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
}

// Default values
fn default_cols() -> i32 { 20 }
fn default_rows() -> i32 { 20 }
fn default_agent_speed() -> f32 { 2.5 }
fn default_agent_radius() -> f32 { 0.5 }
fn default_start_x() -> i32 { 1 }
fn default_start_y() -> i32 { 1 }
fn default_obstacle_radius() -> f32 { std::f32::consts::FRAC_1_SQRT_2 }
fn default_smoothing_enabled() -> bool { true }
fn default_step_size() -> f32 { crate::smoothing::DEFAULT_STEP_SIZE }
fn default_max_expansions() -> usize { crate::pathfinding::DEFAULT_MAX_EXPANSIONS }
fn default_window_title() -> String { "gridwalk - click to move".to_string() }
fn default_cell_size() -> f32 { 30.0 }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_show_path() -> bool { true }
fn default_grid_file_path() -> String { "layouts/default.txt".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_enable_event_log() -> bool { true }
fn default_event_log_path() -> String { "nav_events.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
        }
    }
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            speed: default_agent_speed(),
            radius: default_agent_radius(),
            start_x: default_start_x(),
            start_y: default_start_y(),
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            radius: default_obstacle_radius(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: default_smoothing_enabled(),
            step_size: default_step_size(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: default_max_expansions(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            cell_size: default_cell_size(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            show_path: default_show_path(),
        }
    }
}

impl Default for DefaultGridFileConfig {
    fn default() -> Self {
        Self {
            path: default_grid_file_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            enable_event_log: default_enable_event_log(),
            event_log_path: default_event_log_path(),
        }
    }
}

impl Config {
    /// Load configuration from config.toml, or use defaults if it is missing or broken
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if !path.exists() {
            log::info!("No config.toml found, using default configuration");
            return Config::default();
        }

        match Self::load_from(path) {
            Ok(config) => {
                log::info!("Loaded configuration from config.toml");
                config
            }
            Err(e) => {
                log::warn!("Failed to load config.toml: {}", e);
                log::warn!("Using default configuration");
                Config::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, NavError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, NavError> {
        Ok(toml::from_str(contents)?)
    }

    /// Board size in cells. A bounded layout wins over `[grid]`.
    pub fn board_size(&self, layout: Option<&Grid>) -> (i32, i32) {
        let configured = (self.grid.cols, self.grid.rows);
        let Some((cols, rows)) = layout.and_then(|grid| grid.cols().zip(grid.rows())) else {
            return configured;
        };
        if (cols, rows) != configured {
            log::warn!(
                "Layout is {}x{} but [grid] says {}x{}, using the layout size",
                cols,
                rows,
                configured.0,
                configured.1
            );
        }
        (cols, rows)
    }

    /// Settings the navigation core needs for one agent
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            speed: self.agent.speed,
            radius: self.agent.radius,
            obstacle_radius: self.obstacles.radius,
            smoothing: self.smoothing.enabled,
            step_size: self.smoothing.step_size,
            max_expansions: self.search.max_expansions,
            record_events: self.logging.enable_event_log,
        }
    }
}
