//! Traversal graph construction and uniform-cost path search.
//!
//! The graph is rebuilt from scratch for every path request: terrain costs
//! plus a snapshot of the current obstacle cells. Obstacle cells get a large
//! finite sentinel cost so the search stays well-defined; `path_is_clear`
//! then rejects any path that still crosses one (obstacles may have moved
//! between snapshot and consumption).

use crate::grid::GridCell;
use crate::terrain::TerrainField;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Cost of stepping into an obstacle-occupied cell. Large enough that any
/// detour is cheaper, finite so the search still terminates with an answer.
pub const OBSTACLE_COST: f32 = 10_000.0;

const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// Default expansion budget multiplier: with 8 edges per cell, every queue
/// entry is visited well within 16 pops per node.
const BUDGET_PER_NODE: usize = 16;

/// One weighted edge of the traversal graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub cost: f32,
    pub to: GridCell,
}

/// 8-connected weighted adjacency over the terrain grid.
#[derive(Debug, Clone)]
pub struct TraversalGraph {
    width: u32,
    height: u32,
    edges: Vec<Vec<Edge>>,
}

impl TraversalGraph {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn node_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.column >= 0
            && cell.row >= 0
            && (cell.column as u32) < self.width
            && (cell.row as u32) < self.height
    }

    /// Outgoing edges of `cell`; empty for out-of-bounds cells.
    pub fn neighbors(&self, cell: GridCell) -> &[Edge] {
        match self.index(cell) {
            Some(index) => &self.edges[index],
            None => &[],
        }
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row as usize * self.width as usize + cell.column as usize)
        } else {
            None
        }
    }
}

/// Static per-cell entry cost layer: `1 / speed_modifier`, row-major.
///
/// Separate from obstacle application so callers may cache it between
/// requests while obstacles change every tick.
pub fn terrain_costs(terrain: &TerrainField) -> Vec<f32> {
    terrain
        .iter()
        .map(|(_, tile)| 1.0 / tile.speed_modifier)
        .collect()
}

/// Build the traversal graph from terrain and an obstacle snapshot.
pub fn build_graph(terrain: &TerrainField, obstacles: &[GridCell]) -> TraversalGraph {
    let costs = terrain_costs(terrain);
    build_graph_from_costs(terrain.width(), terrain.height(), costs, obstacles)
}

/// Build the graph from a precomputed terrain-cost layer.
pub fn build_graph_from_costs(
    width: u32,
    height: u32,
    mut costs: Vec<f32>,
    obstacles: &[GridCell],
) -> TraversalGraph {
    debug_assert_eq!(costs.len(), width as usize * height as usize);

    for obstacle in obstacles {
        if obstacle.column >= 0
            && obstacle.row >= 0
            && (obstacle.column as u32) < width
            && (obstacle.row as u32) < height
        {
            let index = obstacle.row as usize * width as usize + obstacle.column as usize;
            costs[index] = OBSTACLE_COST;
        }
    }

    const WAYS: [(i32, i32); 8] = [
        (-1, 0),
        (0, -1),
        (1, 0),
        (0, 1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];

    let mut edges = Vec::with_capacity(costs.len());
    for row in 0..height as i32 {
        for column in 0..width as i32 {
            let mut cell_edges = Vec::with_capacity(8);
            for (dx, dy) in WAYS {
                let to = GridCell::new(column + dx, row + dy);
                if to.column < 0
                    || to.row < 0
                    || to.column as u32 >= width
                    || to.row as u32 >= height
                {
                    continue;
                }
                let entry = costs[to.row as usize * width as usize + to.column as usize];
                let diagonal = dx != 0 && dy != 0;
                let cost = if diagonal { entry * SQRT_2 } else { entry };
                cell_edges.push(Edge { cost, to });
            }
            edges.push(cell_edges);
        }
    }

    TraversalGraph {
        width,
        height,
        edges,
    }
}

/// Path-search failures. None of these are fatal to the simulation; the
/// agent simply stays put and the task may retry or be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathError {
    /// Goal unreachable, or the expansion budget was exhausted.
    NoPathFound,
    /// Goal cell lies outside the grid; no search is performed.
    GoalOutOfBounds { cell: GridCell },
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::NoPathFound => write!(f, "no path to goal"),
            PathError::GoalOutOfBounds { cell } => {
                write!(f, "goal ({}, {}) is out of bounds", cell.column, cell.row)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Min-heap entry ordered by accumulated cost, then cell, so equal-cost
/// frontiers expand deterministically.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f32,
    cell: GridCell,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the cheapest entry.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra search from `start` to `goal` with the default expansion budget.
///
/// Returns the waypoint sequence *excluding* the start cell, goal inclusive.
/// `start == goal` yields an empty path.
pub fn find_path(
    graph: &TraversalGraph,
    start: GridCell,
    goal: GridCell,
) -> Result<Vec<GridCell>, PathError> {
    find_path_with_budget(
        graph,
        start,
        goal,
        graph.node_count().saturating_mul(BUDGET_PER_NODE),
    )
}

/// Dijkstra search with an explicit cap on queue pops. Exceeding the cap is
/// reported as `NoPathFound` so a huge grid cannot stall a tick.
pub fn find_path_with_budget(
    graph: &TraversalGraph,
    start: GridCell,
    goal: GridCell,
    max_expansions: usize,
) -> Result<Vec<GridCell>, PathError> {
    if !graph.contains(goal) {
        return Err(PathError::GoalOutOfBounds { cell: goal });
    }
    if start == goal {
        return Ok(Vec::new());
    }

    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<GridCell, GridCell> = HashMap::new();
    let mut cost_so_far: HashMap<GridCell, f32> = HashMap::new();

    frontier.push(QueueEntry {
        cost: 0.0,
        cell: start,
    });
    let _ = cost_so_far.insert(start, 0.0);

    let mut expansions = 0usize;

    while let Some(QueueEntry { cost, cell }) = frontier.pop() {
        expansions += 1;
        if expansions > max_expansions {
            return Err(PathError::NoPathFound);
        }

        // The goal must be dequeued, not merely discovered, before its cost
        // is final.
        if cell == goal {
            return Ok(reconstruct(&came_from, start, goal));
        }

        // Stale entry superseded by a cheaper one.
        if cost_so_far.get(&cell).is_some_and(|&best| cost > best) {
            continue;
        }

        for edge in graph.neighbors(cell) {
            let new_cost = cost + edge.cost;
            let better = match cost_so_far.get(&edge.to) {
                None => true,
                Some(&existing) => new_cost < existing,
            };
            if better {
                let _ = cost_so_far.insert(edge.to, new_cost);
                let _ = came_from.insert(edge.to, cell);
                frontier.push(QueueEntry {
                    cost: new_cost,
                    cell: edge.to,
                });
            }
        }
    }

    Err(PathError::NoPathFound)
}

fn reconstruct(
    came_from: &HashMap<GridCell, GridCell>,
    start: GridCell,
    goal: GridCell,
) -> Vec<GridCell> {
    let mut path = vec![goal];
    let mut node = goal;
    while let Some(&prev) = came_from.get(&node) {
        if prev == start {
            break;
        }
        path.push(prev);
        node = prev;
    }
    path.reverse();
    path
}

/// True if no path cell coincides with an obstacle cell. The path excludes
/// the agent's own cell by construction, so the agent never blocks itself.
pub fn path_is_clear(path: &[GridCell], obstacles: &[GridCell]) -> bool {
    path.iter().all(|cell| !obstacles.contains(cell))
}

/// Estimated time to walk `path` from `start`: each segment's length divided
/// by the speed modifier of the tile the segment starts on.
pub fn travel_time(start: GridCell, path: &[GridCell], terrain: &TerrainField) -> f32 {
    let mut time = 0.0;
    let mut prev = start;
    for &cell in path {
        let length = prev.position().distance(&cell.position());
        let modifier = terrain.speed_modifier(prev).unwrap_or(1.0);
        time += length / modifier;
        prev = cell;
    }
    time
}
