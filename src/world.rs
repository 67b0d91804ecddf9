//! The routing world: map, territory, shore cache and configuration in one
//! place.
//!
//! Every ownership mutation goes through `World`, which hands the shore
//! cache to the territory as its observer. A query can therefore never see
//! ownership that the cache has not been told about.

use tracing::debug;

use crate::config::RouteConfig;
use crate::map::{Connectivity, ConnectivityError, GameMap, TileRef};
use crate::search::{self, PathResult, SearchMode, SearchParams};
use crate::shore::{self, ShoreTileCache};
use crate::territory::{PlayerId, Territory};
use crate::transport::{self, RouteError, TransportPlan, TransportStep};

#[derive(Debug, Clone)]
pub struct World {
    map: GameMap,
    territory: Territory,
    shores: ShoreTileCache,
    config: RouteConfig,
}

impl World {
    pub fn new(map: GameMap, config: RouteConfig) -> Self {
        let territory = Territory::new(&map);
        World {
            map,
            territory,
            shores: ShoreTileCache::new(),
            config,
        }
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn territory(&self) -> &Territory {
        &self.territory
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RouteConfig {
        &mut self.config
    }

    pub fn shore_cache(&self) -> &ShoreTileCache {
        &self.shores
    }

    /// Replaces the map. Ownership and cached shores are discarded.
    pub fn set_map(&mut self, map: GameMap) {
        self.territory = Territory::new(&map);
        self.shores.invalidate_all();
        self.map = map;
    }

    // ---- Ownership ----

    /// Gives a land tile to `player`. Returns false if the change was rejected.
    pub fn conquer(&mut self, player: PlayerId, tile: TileRef) -> bool {
        self.territory
            .conquer(&self.map, tile, player, &mut self.shores)
    }

    /// Releases a tile. Returns false if it was unowned.
    pub fn relinquish(&mut self, tile: TileRef) -> bool {
        self.territory.relinquish(&self.map, tile, &mut self.shores)
    }

    /// Conquers every land tile in the inclusive rectangle. Corners may be
    /// given in any order and are clipped to the map. Returns the number of
    /// tiles that changed hands.
    pub fn claim_rect(&mut self, player: PlayerId, (x0, y0): (u32, u32), (x1, y1): (u32, u32)) -> usize {
        let max_x = self.map.width().saturating_sub(1);
        let max_y = self.map.height().saturating_sub(1);
        let (lx, hx) = (x0.min(x1), x0.max(x1).min(max_x));
        let (ly, hy) = (y0.min(y1), y0.max(y1).min(max_y));

        let mut claimed = 0;
        for y in ly..=hy {
            for x in lx..=hx {
                if let Some(tile) = self.map.tile_at(x, y) {
                    if self.conquer(player, tile) {
                        claimed += 1;
                    }
                }
            }
        }
        debug!(player = player.0, claimed, "claimed rectangle");
        claimed
    }

    // ---- Queries ----

    pub fn shore_tiles(&mut self, player: PlayerId) -> &[TileRef] {
        self.shores.shore_tiles(&self.map, &self.territory, player)
    }

    pub fn target_transport_tile(&self, target: TileRef) -> Option<TileRef> {
        shore::target_transport_tile(&self.map, target)
    }

    pub fn closest_shore_from_player(&mut self, player: PlayerId, target: TileRef) -> Option<TileRef> {
        shore::closest_shore_from_player(&self.map, &self.territory, &mut self.shores, player, target)
    }

    pub fn candidate_shore_tiles(&mut self, player: PlayerId, target: TileRef) -> Vec<TileRef> {
        shore::candidate_shore_tiles(
            &self.map,
            &self.territory,
            &mut self.shores,
            player,
            target,
            self.config.max_candidates,
        )
    }

    pub fn best_shore_deployment_source(&mut self, player: PlayerId, target: TileRef) -> Option<TileRef> {
        transport::best_shore_deployment_source(
            &self.map,
            &self.territory,
            &mut self.shores,
            player,
            target,
            &self.config,
        )
    }

    /// Full-path search with explicit parameters. `connectivity` must be 4
    /// or 8.
    pub fn mini_search(
        &self,
        origin: TileRef,
        target: TileRef,
        node_budget: u32,
        bias_offshore: bool,
        connectivity: u8,
    ) -> Result<PathResult, ConnectivityError> {
        let params = search_params(node_budget, bias_offshore, connectivity)?;
        Ok(search::mini_search(&self.map, origin, target, &params))
    }

    /// Step-mode counterpart of [`World::mini_search`]: `Pending` with the
    /// next tile, or `Found` once the next move reaches the target.
    pub fn mini_search_step(
        &self,
        origin: TileRef,
        target: TileRef,
        node_budget: u32,
        bias_offshore: bool,
        connectivity: u8,
    ) -> Result<PathResult, ConnectivityError> {
        let params = search_params(node_budget, bias_offshore, connectivity)?
            .with_mode(SearchMode::NextStep);
        Ok(search::mini_search(&self.map, origin, target, &params))
    }

    /// Marks the player's cached shore tiles stale.
    pub fn invalidate_shore_tiles_cache(&mut self, player: PlayerId) {
        self.shores.invalidate(player);
    }

    pub fn plan_transport(&mut self, player: PlayerId, destination: TileRef) -> Result<TransportPlan, RouteError> {
        transport::plan_transport(
            &self.map,
            &self.territory,
            &mut self.shores,
            player,
            destination,
            &self.config,
        )
    }

    pub fn transport_step(&self, current: TileRef, landing: TileRef) -> TransportStep {
        transport::transport_step(&self.map, current, landing, &self.config)
    }
}

fn search_params(
    node_budget: u32,
    bias_offshore: bool,
    connectivity: u8,
) -> Result<SearchParams, ConnectivityError> {
    Ok(SearchParams::new(node_budget)
        .with_bias(bias_offshore)
        .with_connectivity(Connectivity::try_from(connectivity)?))
}
