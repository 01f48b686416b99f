use crate::coords::Cell;
use crate::error::NavError;
use crate::grid::ObstacleMap;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Expansion cap used by [`find_path`] on maps without edges
pub const DEFAULT_MAX_EXPANSIONS: usize = 100_000;

/// A node in the open set
#[derive(Debug, Clone)]
struct SearchNode {
    cell: Cell,
    cost: i32,
    estimate: i32,
    /// Insertion order, breaks ties between equal scores
    sequence: u64,
}

impl SearchNode {
    fn score(&self) -> i32 {
        self.cost + self.estimate
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.score() == other.score() && self.sequence == other.sequence
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .score()
            .cmp(&self.score())
            // Tie-breaker: first inserted pops first
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Open set plus parent links for one search
struct Search {
    open: BinaryHeap<SearchNode>,
    open_cost: HashMap<Cell, i32>,
    closed: HashSet<Cell>,
    parents: HashMap<Cell, Cell>,
    next_sequence: u64,
}

impl Search {
    fn new(start: Cell) -> Self {
        let mut closed = HashSet::new();
        closed.insert(start);
        Search {
            open: BinaryHeap::new(),
            open_cost: HashMap::new(),
            closed,
            parents: HashMap::new(),
            next_sequence: 0,
        }
    }

    /// Insert a cell or relax it if this route is strictly cheaper
    fn offer(&mut self, cell: Cell, parent: Cell, cost: i32, goal: Cell) {
        if self.closed.contains(&cell) {
            return;
        }
        if let Some(&known) = self.open_cost.get(&cell) {
            if known <= cost {
                return;
            }
        }

        self.open_cost.insert(cell, cost);
        self.parents.insert(cell, parent);
        self.open.push(SearchNode {
            cell,
            cost,
            estimate: cell.manhattan(&goal),
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    /// Pop the best live node, skipping entries superseded by a relaxation
    fn pop(&mut self) -> Option<SearchNode> {
        while let Some(node) = self.open.pop() {
            if self.closed.contains(&node.cell) {
                continue;
            }
            if self.open_cost.get(&node.cell) != Some(&node.cost) {
                continue;
            }
            self.open_cost.remove(&node.cell);
            self.closed.insert(node.cell);
            return Some(node);
        }
        None
    }

    fn reconstruct(&self, start: Cell, goal: Cell) -> Vec<Cell> {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            match self.parents.get(&current) {
                Some(&parent) => {
                    path.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Find a shortest 4-connected path from `start` to `goal`.
///
/// Returns the cells from start to goal inclusive. The result is deterministic:
/// neighbors are explored north, east, south, west and equal scores pop in
/// insertion order.
pub fn find_path<M: ObstacleMap + ?Sized>(
    start: Cell,
    goal: Cell,
    obstacles: &M,
) -> Result<Vec<Cell>, NavError> {
    find_path_with_limit(start, goal, obstacles, DEFAULT_MAX_EXPANSIONS)
}

/// [`find_path`] with an explicit cap on expanded nodes.
///
/// The cap only applies to maps whose [`ObstacleMap::cell_count`] is `None`.
/// A bounded search runs until the open set is empty.
pub fn find_path_with_limit<M: ObstacleMap + ?Sized>(
    start: Cell,
    goal: Cell,
    obstacles: &M,
    max_expansions: usize,
) -> Result<Vec<Cell>, NavError> {
    let not_found = || NavError::PathNotFound { start, goal };

    if obstacles.is_blocked(start) {
        log::debug!("[find_path] start {} is blocked", start);
        return Err(not_found());
    }
    if obstacles.is_blocked(goal) {
        log::debug!("[find_path] goal {} is blocked", goal);
        return Err(not_found());
    }
    if start == goal {
        return Ok(vec![start]);
    }

    let mut search = Search::new(start);
    for neighbor in start.neighbors() {
        if !obstacles.is_blocked(neighbor) {
            search.offer(neighbor, start, 1, goal);
        }
    }

    let limit = match obstacles.cell_count() {
        Some(_) => None,
        None => Some(max_expansions),
    };

    let mut expansions = 0;
    while let Some(current) = search.pop() {
        expansions += 1;

        log::trace!(
            "[A*] #{} expanding {} cost={} estimate={}",
            expansions,
            current.cell,
            current.cost,
            current.estimate
        );

        if current.cell == goal {
            let path = search.reconstruct(start, goal);
            log::debug!(
                "[find_path] {} -> {}: {} steps after {} expansions",
                start,
                goal,
                path.len() - 1,
                expansions
            );
            return Ok(path);
        }

        if limit.is_some_and(|cap| expansions >= cap) {
            log::warn!(
                "[find_path] {} -> {}: gave up after {} expansions",
                start,
                goal,
                expansions
            );
            return Err(not_found());
        }

        for neighbor in current.cell.neighbors() {
            if !obstacles.is_blocked(neighbor) {
                search.offer(neighbor, current.cell, current.cost + 1, goal);
            }
        }
    }

    log::debug!(
        "[find_path] {} -> {}: open set exhausted after {} expansions",
        start,
        goal,
        expansions
    );
    Err(not_found())
}

/// Format path for display
pub fn format_path(path: &[Cell]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
