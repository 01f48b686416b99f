use crate::coords::{to_cell, to_position, Cell};
use crate::error::NavError;
use glam::Vec3;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Anything the pathfinder can ask "is this cell walkable?"
pub trait ObstacleMap {
    fn is_blocked(&self, cell: Cell) -> bool;

    /// Number of cells inside the map, `None` when it has no edges
    fn cell_count(&self) -> Option<usize> {
        None
    }
}

impl ObstacleMap for HashSet<Cell> {
    fn is_blocked(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }
}

/// Supplies the obstacles of a scene as world-space centers.
/// Called once when an agent is set up; the result is treated as a snapshot.
pub trait ObstacleSource {
    fn obstacle_centers(&self) -> Vec<Vec3>;

    /// Board size as (cols, rows), if the scene is bounded
    fn bounds(&self) -> Option<(i32, i32)> {
        None
    }
}

impl ObstacleSource for Vec<Vec3> {
    fn obstacle_centers(&self) -> Vec<Vec3> {
        self.clone()
    }
}

impl ObstacleSource for [Vec3] {
    fn obstacle_centers(&self) -> Vec<Vec3> {
        self.to_vec()
    }
}

/// Obstacle grid: a set of blocked cells with optional board bounds.
/// Cells outside the bounds count as blocked.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    blocked: HashSet<Cell>,
    bounds: Option<(i32, i32)>,
    /// Revision number - incremented whenever grid cells change
    revision: u64,
}

/// A parsed layout file: the grid plus optional start/destination markers
#[derive(Clone, Debug)]
pub struct Layout {
    pub grid: Grid,
    pub start: Option<Cell>,
    pub dest: Option<Cell>,
}

impl Grid {
    /// Create a bounded grid with all cells free
    pub fn new(cols: i32, rows: i32) -> Self {
        Grid {
            blocked: HashSet::new(),
            bounds: Some((cols, rows)),
            revision: 0,
        }
    }

    /// Create a grid without bounds; only explicit obstacles block
    pub fn unbounded() -> Self {
        Grid::default()
    }

    /// Create a bounded grid with specific blocked cells
    pub fn with_blocked(cols: i32, rows: i32, blocked: &[Cell]) -> Self {
        let mut grid = Self::new(cols, rows);
        for &cell in blocked {
            grid.set_blocked(cell, true);
        }
        grid
    }

    /// Build the blocked-cell set from obstacle centers
    pub fn from_source<S: ObstacleSource + ?Sized>(source: &S) -> Self {
        let mut grid = Grid {
            bounds: source.bounds(),
            ..Grid::default()
        };
        for center in source.obstacle_centers() {
            grid.blocked.insert(to_cell(center));
        }
        grid
    }

    pub fn cols(&self) -> Option<i32> {
        self.bounds.map(|(cols, _)| cols)
    }

    pub fn rows(&self) -> Option<i32> {
        self.bounds.map(|(_, rows)| rows)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        match self.bounds {
            Some((cols, rows)) => cell.x >= 0 && cell.x < cols && cell.y >= 0 && cell.y < rows,
            None => true,
        }
    }

    /// Mark or clear a cell. Cells outside the bounds are ignored.
    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        if !self.in_bounds(cell) {
            return;
        }
        let changed = if blocked {
            self.blocked.insert(cell)
        } else {
            self.blocked.remove(&cell)
        };
        if changed {
            self.revision += 1;
        }
    }

    pub fn toggle(&mut self, cell: Cell) {
        let blocked = self.blocked.contains(&cell);
        self.set_blocked(cell, !blocked);
    }

    /// Explicitly blocked cells, sorted for stable output
    pub fn blocked_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.blocked.iter().copied().collect();
        cells.sort_by_key(|c| (c.y, c.x));
        cells
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    /// Get current grid revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Parse a text layout.
    ///
    /// `■`/`#` is blocked, `□`/`.`/space is free, `S` marks the start and `D`
    /// the destination. All rows must have the same width.
    pub fn parse_layout(text: &str) -> Result<Layout, NavError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .collect();

        let cols = match lines.first() {
            Some(first) => first.chars().count() as i32,
            None => return Err(NavError::Layout("no grid rows".to_string())),
        };

        let mut grid = Grid::new(cols, lines.len() as i32);
        let mut start = None;
        let mut dest = None;

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != cols {
                return Err(NavError::Layout(format!(
                    "row {} has width {}, expected {}",
                    y,
                    line.chars().count(),
                    cols
                )));
            }
            for (x, ch) in line.chars().enumerate() {
                let cell = Cell::new(x as i32, y as i32);
                match ch {
                    '■' | '#' => grid.set_blocked(cell, true),
                    '□' | '.' | ' ' => {}
                    'S' | 's' => start = Some(cell),
                    'D' | 'd' => dest = Some(cell),
                    other => {
                        return Err(NavError::Layout(format!(
                            "unknown symbol '{}' at {}",
                            other, cell
                        )))
                    }
                }
            }
        }

        // Parsing is construction, not an edit
        grid.revision = 0;
        Ok(Layout { grid, start, dest })
    }

    /// Parse a layout and keep only the grid
    pub fn from_layout(text: &str) -> Result<Self, NavError> {
        Ok(Self::parse_layout(text)?.grid)
    }

    pub fn load_layout(path: impl AsRef<Path>) -> Result<Layout, NavError> {
        let text = fs::read_to_string(path)?;
        Self::parse_layout(&text)
    }

    /// Render the grid in the layout format. Unbounded grids are rendered over
    /// the bounding box of their obstacles.
    pub fn to_layout(&self) -> String {
        let (min_x, min_y, max_x, max_y) = match self.bounds {
            Some((cols, rows)) => (0, 0, cols - 1, rows - 1),
            None => {
                if self.blocked.is_empty() {
                    return String::new();
                }
                let min_x = self.blocked.iter().map(|c| c.x).min().unwrap_or(0);
                let min_y = self.blocked.iter().map(|c| c.y).min().unwrap_or(0);
                let max_x = self.blocked.iter().map(|c| c.x).max().unwrap_or(0);
                let max_y = self.blocked.iter().map(|c| c.y).max().unwrap_or(0);
                (min_x, min_y, max_x, max_y)
            }
        };

        let mut result = String::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let symbol = if self.blocked.contains(&Cell::new(x, y)) {
                    '■'
                } else {
                    '□'
                };
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }
}

impl ObstacleMap for Grid {
    fn is_blocked(&self, cell: Cell) -> bool {
        !self.in_bounds(cell) || self.blocked.contains(&cell)
    }

    fn cell_count(&self) -> Option<usize> {
        self.bounds
            .map(|(cols, rows)| cols.max(0) as usize * rows.max(0) as usize)
    }
}

impl ObstacleSource for Grid {
    fn obstacle_centers(&self) -> Vec<Vec3> {
        self.blocked_cells().into_iter().map(to_position).collect()
    }

    fn bounds(&self) -> Option<(i32, i32)> {
        self.bounds
    }
}
