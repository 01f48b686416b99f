#![allow(dead_code)]

use gridwalk::{Cell, Grid, Layout, ObstacleMap};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;

/// A layout fixture from test_data/layouts
///
/// Format: an optional `expect: N` (or `expect: none`) line, then the grid
/// with `S` and `D` markers.
pub struct Fixture {
    pub name: String,
    pub grid: Grid,
    pub start: Cell,
    pub dest: Cell,
    /// Shortest path length in steps, `None` when unreachable
    pub expected: Option<usize>,
}

pub fn load_fixture(path: &Path) -> Result<Fixture, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let mut expected = None;
    let mut grid_text = String::new();

    for line in contents.lines() {
        if let Some(value) = line.strip_prefix("expect:") {
            let value = value.trim();
            expected = if value == "none" {
                None
            } else {
                Some(value.parse()?)
            };
        } else {
            grid_text.push_str(line);
            grid_text.push('\n');
        }
    }

    let Layout { grid, start, dest } = Grid::parse_layout(&grid_text)?;
    let name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(Fixture {
        name,
        grid,
        start: start.ok_or("fixture has no 'S'")?,
        dest: dest.ok_or("fixture has no 'D'")?,
        expected,
    })
}

/// All fixtures in a directory, sorted by file name
pub fn load_fixtures(dir: &str) -> Vec<Fixture> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).collect())
        .unwrap_or_default();
    entries.sort_by_key(|e| e.file_name());

    entries
        .iter()
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
        .map(|p| load_fixture(&p).unwrap_or_else(|e| panic!("{}: {}", p.display(), e)))
        .collect()
}

/// Brute-force shortest distance in steps
pub fn bfs_distance<M: ObstacleMap>(grid: &M, start: Cell, goal: Cell) -> Option<usize> {
    if grid.is_blocked(start) || grid.is_blocked(goal) {
        return None;
    }

    let mut distances: HashMap<Cell, usize> = HashMap::new();
    let mut queue = VecDeque::new();
    distances.insert(start, 0);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let distance = distances[&cell];
        if cell == goal {
            return Some(distance);
        }
        for neighbor in cell.neighbors() {
            if !grid.is_blocked(neighbor) && !distances.contains_key(&neighbor) {
                distances.insert(neighbor, distance + 1);
                queue.push_back(neighbor);
            }
        }
    }

    None
}

/// Panic unless `path` is a connected, obstacle-free walk from start to goal
pub fn assert_valid_path<M: ObstacleMap>(grid: &M, path: &[Cell], start: Cell, goal: Cell) {
    assert_eq!(path.first(), Some(&start), "path must begin at start");
    assert_eq!(path.last(), Some(&goal), "path must end at goal");
    for cell in path {
        assert!(!grid.is_blocked(*cell), "path crosses obstacle at {}", cell);
    }
    for pair in path.windows(2) {
        assert!(
            pair[0].is_adjacent(&pair[1]),
            "{} and {} are not adjacent",
            pair[0],
            pair[1]
        );
    }
}

/// Visualize a path on a bounded grid
pub fn visualize_path(grid: &Grid, path: &[Cell], start: Cell, dest: Cell) -> String {
    let mut result = String::new();
    let cols = grid.cols().unwrap_or(0);
    let rows = grid.rows().unwrap_or(0);

    for y in 0..rows {
        for x in 0..cols {
            let cell = Cell::new(x, y);
            let symbol = if cell == start {
                'S'
            } else if cell == dest {
                'D'
            } else if path.contains(&cell) {
                '*'
            } else if grid.is_blocked(cell) {
                '█'
            } else {
                '.'
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}

/// Deterministic pseudo-random board; `start` and `goal` are always left free
pub fn random_grid(cols: i32, rows: i32, density: f64, seed: u64, keep_free: &[Cell]) -> Grid {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut grid = Grid::new(cols, rows);

    for y in 0..rows {
        for x in 0..cols {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let sample = (state >> 11) as f64 / (1u64 << 53) as f64;
            let cell = Cell::new(x, y);
            if sample < density && !keep_free.contains(&cell) {
                grid.set_blocked(cell, true);
            }
        }
    }

    grid
}
