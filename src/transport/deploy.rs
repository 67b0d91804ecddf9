//! Deployment-source optimisation.
//!
//! Straight-line distance picks a poor embarkation tile when the coastline
//! is convoluted. This runs one bounded search per candidate and keeps the
//! cheapest real route. The candidate cap, not the territory size, bounds
//! the number of searches.

use rayon::prelude::*;
use tracing::debug;

use crate::config::RouteConfig;
use crate::map::{GameMap, TileRef};
use crate::search::{mini_search, PathResult, Route, SearchMode, SearchParams};
use crate::shore::{candidate_shore_tiles, ShoreTileCache};
use crate::territory::{PlayerId, Territory};

/// The chosen embarkation tile and its route to the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub source: TileRef,
    pub route: Route,
}

/// Returns the player's cheapest embarkation tile toward `target`, or `None`
/// if no candidate reaches it within the deploy budget.
pub fn best_shore_deployment_source(
    map: &GameMap,
    territory: &Territory,
    cache: &mut ShoreTileCache,
    player: PlayerId,
    target: TileRef,
    config: &RouteConfig,
) -> Option<TileRef> {
    best_deployment(map, territory, cache, player, target, config).map(|d| d.source)
}

/// Like [`best_shore_deployment_source`] but also returns the winning route.
pub fn best_deployment(
    map: &GameMap,
    territory: &Territory,
    cache: &mut ShoreTileCache,
    player: PlayerId,
    target: TileRef,
    config: &RouteConfig,
) -> Option<Deployment> {
    let candidates =
        candidate_shore_tiles(map, territory, cache, player, target, config.max_candidates);
    let best = rank_candidates(
        map,
        &candidates,
        target,
        &config.deploy_params(),
        config.parallel_candidates,
    );
    if best.is_none() {
        debug!(
            player = player.0,
            candidates = candidates.len(),
            "no embarkation candidate reaches target"
        );
    }
    best
}

/// Searches from every candidate to `target` and keeps the lowest-cost
/// route. Ties go to the earlier candidate; unreachable candidates are
/// skipped.
///
/// With `parallel` the searches run on the rayon pool. Results are reduced
/// in candidate order, so the choice is the same as the sequential run.
pub fn rank_candidates(
    map: &GameMap,
    candidates: &[TileRef],
    target: TileRef,
    params: &SearchParams,
    parallel: bool,
) -> Option<Deployment> {
    let params = params.with_mode(SearchMode::FullPath);
    let results: Vec<PathResult> = if parallel && candidates.len() > 1 {
        candidates
            .par_iter()
            .map(|&c| mini_search(map, c, target, &params))
            .collect()
    } else {
        candidates
            .iter()
            .map(|&c| mini_search(map, c, target, &params))
            .collect()
    };

    let mut best: Option<Deployment> = None;
    let mut unreachable = 0usize;
    for (&source, result) in candidates.iter().zip(results) {
        match result {
            PathResult::Found(route) => {
                if best.as_ref().map_or(true, |b| route.cost < b.route.cost) {
                    best = Some(Deployment { source, route });
                }
            }
            _ => unreachable += 1,
        }
    }
    debug!(
        candidates = candidates.len(),
        unreachable,
        best_cost = best.as_ref().map(|b| b.route.cost),
        "ranked embarkation candidates"
    );
    best
}
