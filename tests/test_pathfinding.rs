mod common;

use common::{assert_valid_path, bfs_distance, random_grid, visualize_path};
use gridwalk::pathfinding::{find_path_with_limit, format_path, DEFAULT_MAX_EXPANSIONS};
use gridwalk::{find_path, Cell, Grid, NavError};
use std::collections::HashSet;

#[test]
fn test_open_board_corner_to_corner() {
    let grid = Grid::new(5, 5);
    let start = Cell::new(0, 0);
    let goal = Cell::new(4, 4);

    let path = find_path(start, goal, &grid).unwrap();
    println!("{}", visualize_path(&grid, &path, start, goal));

    assert_valid_path(&grid, &path, start, goal);
    assert_eq!(path.len() - 1, 8);
    // Every step moves towards the goal
    for pair in path.windows(2) {
        assert_eq!(pair[1].manhattan(&goal), pair[0].manhattan(&goal) - 1);
    }
}

#[test]
fn test_single_obstacle_adds_two_steps() {
    let start = Cell::new(0, 0);
    let goal = Cell::new(2, 0);

    let open = Grid::new(5, 5);
    let direct = find_path(start, goal, &open).unwrap();
    assert_eq!(direct, vec![start, Cell::new(1, 0), goal]);

    let blocked = Grid::with_blocked(5, 5, &[Cell::new(1, 0)]);
    let detour = find_path(start, goal, &blocked).unwrap();
    assert_valid_path(&blocked, &detour, start, goal);
    assert_eq!(detour.len(), direct.len() + 2);
    assert_eq!(detour[1], Cell::new(0, 1));
}

#[test]
fn test_goal_on_obstacle() {
    let grid = Grid::with_blocked(5, 5, &[Cell::new(3, 3)]);
    let result = find_path(Cell::new(0, 0), Cell::new(3, 3), &grid);
    match result {
        Err(NavError::PathNotFound { start, goal }) => {
            assert_eq!(start, Cell::new(0, 0));
            assert_eq!(goal, Cell::new(3, 3));
        }
        other => panic!("expected PathNotFound, got {:?}", other),
    }
}

#[test]
fn test_enclosed_start() {
    let start = Cell::new(2, 2);
    let grid = Grid::with_blocked(5, 5, &start.neighbors());
    assert!(matches!(
        find_path(start, Cell::new(4, 4), &grid),
        Err(NavError::PathNotFound { .. })
    ));
}

#[test]
fn test_walled_off_region() {
    // Vertical wall splits the board in two
    let wall: Vec<Cell> = (0..6).map(|y| Cell::new(3, y)).collect();
    let grid = Grid::with_blocked(7, 6, &wall);
    assert!(find_path(Cell::new(0, 0), Cell::new(6, 5), &grid).is_err());
    assert!(find_path(Cell::new(0, 0), Cell::new(2, 5), &grid).is_ok());
}

#[test]
fn test_unbounded_obstacles() {
    let walls: HashSet<Cell> = (-3..=3).map(|y| Cell::new(0, y)).collect();
    let start = Cell::new(-2, 0);
    let goal = Cell::new(2, 0);

    let path = find_path(start, goal, &walls).unwrap();
    assert_valid_path(&walls, &path, start, goal);
    assert_eq!(Some(path.len() - 1), bfs_distance(&walls, start, goal));
}

#[test]
fn test_expansion_cap() {
    // Empty plane without edges
    let open: HashSet<Cell> = HashSet::new();
    let start = Cell::new(0, 0);
    let goal = Cell::new(29, 29);
    assert!(find_path_with_limit(start, goal, &open, 10).is_err());
    assert!(find_path_with_limit(start, goal, &open, 10_000).is_ok());
}

/// Walls on every odd column, with gaps alternating between the bottom and top rows
fn serpentine(size: i32) -> Grid {
    let mut grid = Grid::new(size, size);
    for x in (1..size).step_by(2) {
        let gap = if (x / 2) % 2 == 0 { size - 1 } else { 0 };
        for y in 0..size {
            if y != gap {
                grid.set_blocked(Cell::new(x, y), true);
            }
        }
    }
    grid
}

#[test]
fn test_expansion_cap_ignored_on_bounded_grid() {
    let grid = serpentine(21);
    let start = Cell::new(0, 0);
    let goal = Cell::new(20, 20);

    let path = find_path_with_limit(start, goal, &grid, 10).unwrap();
    assert_valid_path(&grid, &path, start, goal);
    assert_eq!(Some(path.len() - 1), bfs_distance(&grid, start, goal));
}

#[test]
fn test_long_serpentine_board() {
    let grid = serpentine(501);
    let start = Cell::new(0, 0);
    let goal = Cell::new(500, 500);

    let path = find_path(start, goal, &grid).unwrap();
    let steps = path.len() - 1;
    assert_eq!(steps, 126_000);
    assert!(steps > DEFAULT_MAX_EXPANSIONS);
    assert_eq!(Some(steps), bfs_distance(&grid, start, goal));
    assert_valid_path(&grid, &path, start, goal);
}

fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
    coords.iter().map(|&(x, y)| Cell::new(x, y)).collect()
}

#[test]
fn test_cheaper_route_replaces_open_entry() {
    // Never re-queuing an open cell also gives 24 steps here, through (7,9)
    let board = Grid::parse_layout(concat!(
        "S....##....#\n",
        "............\n",
        "..####....##\n",
        "....##...#.#\n",
        "#.#..#......\n",
        "....#.#..#.#\n",
        ".#.#........\n",
        "#....#.###.#\n",
        "#...#.......\n",
        "..###.#..###\n",
        ".#.....#....\n",
        "#.#.#......D\n",
    ))
    .unwrap();
    let (start, goal) = (board.start.unwrap(), board.dest.unwrap());

    let path = find_path(start, goal, &board.grid).unwrap();
    assert_eq!(
        path,
        cells(&[
            (0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (4, 1), (5, 1), (6, 1), (7, 1),
            (7, 2), (7, 3), (7, 4), (7, 5), (7, 6), (6, 6), (6, 7), (6, 8), (7, 8),
            (8, 8), (8, 9), (8, 10), (9, 10), (10, 10), (11, 10), (11, 11),
        ])
    );
}

#[test]
fn test_relaxation_keeps_path_optimal() {
    // Without re-queuing open cells this board comes out at 26 steps
    let board = Grid::parse_layout(concat!(
        "S#.##.###..#\n",
        "...#.###...#\n",
        ".#.....#....\n",
        "##.#....##..\n",
        "#.#.....#...\n",
        "#...###...#.\n",
        "#.....#.###.\n",
        "..###.......\n",
        "........##..\n",
        "......####..\n",
        "....#.....##\n",
        "#.....###..D\n",
    ))
    .unwrap();
    let (start, goal) = (board.start.unwrap(), board.dest.unwrap());

    let path = find_path(start, goal, &board.grid).unwrap();
    assert_eq!(path.len() - 1, 24);
    assert_eq!(
        path,
        cells(&[
            (0, 0), (0, 1), (1, 1), (2, 1), (2, 2), (3, 2), (4, 2), (4, 3), (4, 4),
            (3, 4), (3, 5), (3, 6), (4, 6), (5, 6), (5, 7), (5, 8), (5, 9), (5, 10),
            (6, 10), (7, 10), (8, 10), (9, 10), (9, 11), (10, 11), (11, 11),
        ])
    );
}

#[test]
fn test_optimal_against_bfs_on_random_boards() {
    let start = Cell::new(0, 0);
    let goal = Cell::new(11, 11);
    let mut reachable = 0;

    for seed in 0..200 {
        let grid = random_grid(12, 12, 0.3, seed, &[start, goal]);
        let expected = bfs_distance(&grid, start, goal);

        match (find_path(start, goal, &grid), expected) {
            (Ok(path), Some(steps)) => {
                assert_valid_path(&grid, &path, start, goal);
                assert_eq!(
                    path.len() - 1,
                    steps,
                    "seed {} not optimal:\n{}",
                    seed,
                    visualize_path(&grid, &path, start, goal)
                );
                reachable += 1;
            }
            (Err(_), None) => {}
            (Ok(path), None) => panic!("seed {}: BFS found nothing but got {}", seed, format_path(&path)),
            (Err(e), Some(steps)) => panic!("seed {}: {} (BFS found {} steps)", seed, e, steps),
        }
    }

    println!("{} of 200 random boards were solvable", reachable);
}

#[test]
fn test_deterministic_on_random_boards() {
    let start = Cell::new(0, 5);
    let goal = Cell::new(14, 9);

    for seed in 0..50 {
        let grid = random_grid(15, 15, 0.25, seed, &[start, goal]);
        let first = find_path(start, goal, &grid).ok();
        let second = find_path(start, goal, &grid).ok();
        assert_eq!(first, second, "seed {}", seed);
    }
}
