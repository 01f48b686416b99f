use crate::coords::Cell;
use thiserror::Error;

/// Errors produced by the navigation pipeline and its file helpers
#[derive(Debug, Error)]
pub enum NavError {
    /// Goal unreachable from start with the current obstacles
    #[error("no path from {start} to {goal}")]
    PathNotFound { start: Cell, goal: Cell },

    /// A curve needs at least two waypoints
    #[error("curve needs at least 2 waypoints, got {count}")]
    DegenerateCurveInput { count: usize },

    #[error("invalid layout: {0}")]
    Layout(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
