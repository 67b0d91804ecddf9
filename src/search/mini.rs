//! Node-budgeted A* over water ("Mini" pathfinder).
//!
//! Used both to advance transports one tile per tick and to rank
//! embarkation candidates. Every call is a fresh search: nothing carries
//! over between calls, and the node budget caps the work of a single call.

use std::collections::HashMap;

use thiserror::Error;
use tracing::trace;

use crate::map::{Connectivity, GameMap, TileRef};

use super::frontier::Frontier;

/// Water tiles this close to land cost extra when the offshore bias is on.
pub const OFFSHORE_MARGIN: u8 = 2;

/// Extra cost of entering a near-shore water tile under the offshore bias.
pub const OFFSHORE_PENALTY: u32 = 1;

/// Whether the caller wants the whole route or only the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchMode {
    #[default]
    FullPath,
    NextStep,
}

/// Parameters for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum number of node expansions.
    pub node_budget: u32,
    /// Penalise water tiles within `OFFSHORE_MARGIN` of land.
    pub bias_offshore: bool,
    pub connectivity: Connectivity,
    pub mode: SearchMode,
}

impl SearchParams {
    /// Full-path, unbiased, four-way search with the given budget.
    pub fn new(node_budget: u32) -> Self {
        SearchParams {
            node_budget,
            bias_offshore: false,
            connectivity: Connectivity::Four,
            mode: SearchMode::FullPath,
        }
    }

    pub fn with_bias(mut self, bias_offshore: bool) -> Self {
        self.bias_offshore = bias_offshore;
        self
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A route from origin to target, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub tiles: Vec<TileRef>,
    /// Accumulated step cost, including any offshore penalty.
    pub cost: u32,
    pub nodes_expanded: u32,
}

impl Route {
    pub fn origin(&self) -> TileRef {
        self.tiles[0]
    }

    pub fn target(&self) -> TileRef {
        self.tiles[self.tiles.len() - 1]
    }

    /// The tile after the origin, or `None` if origin and target coincide.
    pub fn next_tile(&self) -> Option<TileRef> {
        self.tiles.get(1).copied()
    }

    /// Number of moves along the route.
    pub fn steps(&self) -> usize {
        self.tiles.len() - 1
    }
}

/// Why a search produced no route. Both are normal outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unreachable {
    #[error("node budget exhausted after {expanded} expansions")]
    BudgetExhausted { expanded: u32 },

    #[error("no water route after {expanded} expansions")]
    NoPath { expanded: u32 },
}

impl Unreachable {
    pub fn expanded(self) -> u32 {
        match self {
            Unreachable::BudgetExhausted { expanded } | Unreachable::NoPath { expanded } => expanded,
        }
    }

    /// Short diagnostic tag.
    pub fn tag(self) -> &'static str {
        match self {
            Unreachable::BudgetExhausted { .. } => "exhausted",
            Unreachable::NoPath { .. } => "nopath",
        }
    }
}

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResult {
    /// Target reached. In step mode, the next step lands on the target.
    Found(Route),
    /// Step mode: the target is still more than one step away.
    Pending {
        next: TileRef,
        cost: u32,
        nodes_expanded: u32,
    },
    Unreachable(Unreachable),
}

impl PathResult {
    pub fn route(&self) -> Option<&Route> {
        match self {
            PathResult::Found(route) => Some(route),
            _ => None,
        }
    }

    /// The tile to advance to, if any.
    pub fn next_tile(&self) -> Option<TileRef> {
        match self {
            PathResult::Found(route) => route.next_tile(),
            PathResult::Pending { next, .. } => Some(*next),
            PathResult::Unreachable(_) => None,
        }
    }

    /// Cost of the full route when one was found.
    pub fn cost(&self) -> Option<u32> {
        match self {
            PathResult::Found(route) => Some(route.cost),
            PathResult::Pending { cost, .. } => Some(*cost),
            PathResult::Unreachable(_) => None,
        }
    }

    pub fn nodes_expanded(&self) -> u32 {
        match self {
            PathResult::Found(route) => route.nodes_expanded,
            PathResult::Pending { nodes_expanded, .. } => *nodes_expanded,
            PathResult::Unreachable(u) => u.expanded(),
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, PathResult::Unreachable(_))
    }
}

/// Best-known state of a visited tile.
#[derive(Debug, Clone, Copy)]
struct NodeRecord {
    g: u32,
    parent: Option<TileRef>,
    closed: bool,
}

/// Searches for a water route from `origin` to `target`.
///
/// Only water tiles are expanded, apart from the two endpoints, which may be
/// any class. The heuristic is Manhattan distance for four-way connectivity
/// and Chebyshev distance for eight-way. Step costs are at least 1 and the
/// offshore bias only adds cost, so the heuristic stays consistent and a
/// returned route is the cheapest one under the active cost function.
pub fn mini_search(
    map: &GameMap,
    origin: TileRef,
    target: TileRef,
    params: &SearchParams,
) -> PathResult {
    if !map.contains(origin) || !map.contains(target) {
        return PathResult::Unreachable(Unreachable::NoPath { expanded: 0 });
    }
    if origin == target {
        let route = Route {
            tiles: vec![origin],
            cost: 0,
            nodes_expanded: 0,
        };
        return PathResult::Found(route);
    }

    let heuristic = |tile: TileRef| match params.connectivity {
        Connectivity::Four => map.manhattan(tile, target),
        Connectivity::Eight => map.chebyshev(tile, target),
    };
    let traversable = |tile: TileRef| tile == target || tile == origin || map.is_water(tile);

    let mut frontier = Frontier::new();
    let mut nodes: HashMap<TileRef, NodeRecord> = HashMap::new();
    nodes.insert(
        origin,
        NodeRecord {
            g: 0,
            parent: None,
            closed: false,
        },
    );
    frontier.push(origin, 0, heuristic(origin));

    let mut expanded = 0u32;
    while let Some(node) = frontier.pop() {
        match nodes.get_mut(&node.tile) {
            Some(rec) if !rec.closed && node.g <= rec.g => rec.closed = true,
            _ => continue,
        }

        if node.tile == target {
            let route = reconstruct(&nodes, target, node.g, expanded);
            trace!(
                steps = route.steps(),
                cost = route.cost,
                expanded,
                "mini search found route"
            );
            return finish(route, params.mode);
        }
        if expanded >= params.node_budget {
            trace!(expanded, frontier = frontier.len(), "mini search budget exhausted");
            return PathResult::Unreachable(Unreachable::BudgetExhausted { expanded });
        }
        expanded += 1;

        for next in map.neighbors(node.tile, params.connectivity) {
            if !traversable(next) || !corner_open(map, node.tile, next, &traversable) {
                continue;
            }
            let g = node.g.saturating_add(step_cost(map, next, params.bias_offshore));
            match nodes.get_mut(&next) {
                Some(rec) if rec.closed || rec.g <= g => continue,
                Some(rec) => {
                    rec.g = g;
                    rec.parent = Some(node.tile);
                }
                None => {
                    nodes.insert(
                        next,
                        NodeRecord {
                            g,
                            parent: Some(node.tile),
                            closed: false,
                        },
                    );
                }
            }
            frontier.push(next, g, heuristic(next));
        }
    }

    trace!(expanded, "mini search frontier emptied");
    PathResult::Unreachable(Unreachable::NoPath { expanded })
}

/// Cost of entering `tile`.
fn step_cost(map: &GameMap, tile: TileRef, bias_offshore: bool) -> u32 {
    if bias_offshore && map.is_water(tile) && map.land_distance(tile) <= OFFSHORE_MARGIN {
        1 + OFFSHORE_PENALTY
    } else {
        1
    }
}

/// Diagonal moves need at least one open orthogonal tile beside them, so a
/// route never squeezes between two touching land corners.
fn corner_open<F>(map: &GameMap, from: TileRef, to: TileRef, traversable: &F) -> bool
where
    F: Fn(TileRef) -> bool,
{
    let (fx, fy) = map.coords(from);
    let (tx, ty) = map.coords(to);
    if fx == tx || fy == ty {
        return true;
    }
    [map.tile_at(tx, fy), map.tile_at(fx, ty)]
        .into_iter()
        .flatten()
        .any(traversable)
}

fn reconstruct(
    nodes: &HashMap<TileRef, NodeRecord>,
    target: TileRef,
    cost: u32,
    expanded: u32,
) -> Route {
    let mut tiles = vec![target];
    let mut cursor = nodes.get(&target).and_then(|r| r.parent);
    while let Some(tile) = cursor {
        tiles.push(tile);
        cursor = nodes.get(&tile).and_then(|r| r.parent);
    }
    tiles.reverse();
    Route {
        tiles,
        cost,
        nodes_expanded: expanded,
    }
}

fn finish(route: Route, mode: SearchMode) -> PathResult {
    match mode {
        SearchMode::FullPath => PathResult::Found(route),
        SearchMode::NextStep if route.tiles.len() <= 2 => PathResult::Found(route),
        SearchMode::NextStep => PathResult::Pending {
            next: route.tiles[1],
            cost: route.cost,
            nodes_expanded: route.nodes_expanded,
        },
    }
}
