use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Height at which cell positions sit above the floor
pub const FLOOR_OFFSET: f32 = 0.5;

/// A cell on the search grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn north(&self) -> Cell {
        Cell::new(self.x, self.y - 1)
    }

    pub fn east(&self) -> Cell {
        Cell::new(self.x + 1, self.y)
    }

    pub fn south(&self) -> Cell {
        Cell::new(self.x, self.y + 1)
    }

    pub fn west(&self) -> Cell {
        Cell::new(self.x - 1, self.y)
    }

    /// The four axis-aligned neighbors, always in north, east, south, west order.
    /// Search tie-breaking depends on this order staying fixed.
    pub fn neighbors(&self) -> [Cell; 4] {
        [self.north(), self.east(), self.south(), self.west()]
    }

    /// Manhattan distance to another cell
    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Map a world position onto the grid.
///
/// The planar axes are `x` and `z`; the vertical `y` is ignored. Halves round
/// to the even integer.
pub fn to_cell(position: Vec3) -> Cell {
    Cell::new(
        position.x.round_ties_even() as i32,
        position.z.round_ties_even() as i32,
    )
}

/// Canonical world position of a cell, lifted to [`FLOOR_OFFSET`]
pub fn to_position(cell: Cell) -> Vec3 {
    to_position_at(cell, FLOOR_OFFSET)
}

pub fn to_position_at(cell: Cell, height: f32) -> Vec3 {
    Vec3::new(cell.x as f32, height, cell.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_order() {
        let cell = Cell::new(3, 3);
        assert_eq!(
            cell.neighbors(),
            [Cell::new(3, 2), Cell::new(4, 3), Cell::new(3, 4), Cell::new(2, 3)]
        );
        assert!(cell.neighbors().iter().all(|n| n.is_adjacent(&cell)));
    }

    #[test]
    fn test_to_cell_ignores_height() {
        assert_eq!(to_cell(Vec3::new(2.2, 7.0, -1.4)), Cell::new(2, -1));
        assert_eq!(to_cell(Vec3::new(2.6, -3.0, 0.51)), Cell::new(3, 1));
    }

    #[test]
    fn test_to_cell_rounds_half_to_even() {
        assert_eq!(to_cell(Vec3::new(0.5, 0.0, 1.5)), Cell::new(0, 2));
        assert_eq!(to_cell(Vec3::new(2.5, 0.0, -0.5)), Cell::new(2, 0));
    }

    #[test]
    fn test_position_roundtrip() {
        let cell = Cell::new(-4, 9);
        let pos = to_position(cell);
        assert_eq!(pos, Vec3::new(-4.0, FLOOR_OFFSET, 9.0));
        assert_eq!(to_cell(pos), cell);
        assert_eq!(to_position_at(cell, 2.0).y, 2.0);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Cell::new(0, 0).manhattan(&Cell::new(4, 4)), 8);
        assert_eq!(Cell::new(-1, 2).manhattan(&Cell::new(1, -2)), 6);
        assert!(!Cell::new(0, 0).is_adjacent(&Cell::new(1, 1)));
    }
}
