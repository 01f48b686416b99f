pub mod agent;
pub mod config;
pub mod coords;
pub mod curve;
pub mod error;
pub mod event_log;
pub mod grid;
pub mod pathfinding;
pub mod smoothing;

pub use agent::{Agent, AgentConfig, AgentState, FollowState, PositionSink};
pub use coords::{to_cell, to_position, Cell};
pub use curve::CatmullRomCurve;
pub use error::NavError;
pub use grid::{Grid, Layout, ObstacleMap, ObstacleSource};
pub use pathfinding::find_path;
pub use smoothing::{smooth_path, PathSmoother};
