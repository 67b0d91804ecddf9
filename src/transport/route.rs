//! Transport route façade.
//!
//! The two calls unit execution makes: plan a transport (landing zone plus
//! embarkation) when it is created, and ask for the next tile on every
//! movement tick. Owns no state.

use thiserror::Error;
use tracing::debug;

use crate::config::{EmbarkStrategy, RouteConfig};
use crate::map::{GameMap, TileRef};
use crate::search::{mini_search, PathResult, Unreachable};
use crate::shore::{closest_shore_from_player, target_transport_tile, ShoreTileCache};
use crate::territory::{PlayerId, Territory};

use super::deploy::best_shore_deployment_source;

/// Reasons a transport cannot be planned right now. None are faults; the
/// requested action should simply be refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("tile {0} is outside the map")]
    OutOfBounds(TileRef),

    #[error("destination {destination} already belongs to player {player}")]
    OwnTerritory {
        player: PlayerId,
        destination: TileRef,
    },

    #[error("landing zone {landing} already belongs to player {player}")]
    OwnLanding { player: PlayerId, landing: TileRef },

    #[error("no shore tile near destination {0}")]
    NoLandingZone(TileRef),

    #[error("player {player} has no shore tile to embark from toward {landing}")]
    NoEmbarkation { player: PlayerId, landing: TileRef },
}

impl RouteError {
    /// Short diagnostic tag.
    pub fn tag(self) -> &'static str {
        match self {
            RouteError::OutOfBounds(_) => "outofbounds",
            RouteError::OwnTerritory { .. } => "own",
            RouteError::OwnLanding { .. } => "ownlanding",
            RouteError::NoLandingZone(_) => "nolanding",
            RouteError::NoEmbarkation { .. } => "noembark",
        }
    }
}

/// Where a transport leaves from and where it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportPlan {
    pub player: PlayerId,
    pub destination: TileRef,
    pub landing: TileRef,
    pub embark: TileRef,
}

/// Outcome of one movement tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStep {
    /// Move to this tile; the landing zone is still further on.
    Advance(TileRef),
    /// Move onto the landing zone (or already there).
    Land(TileRef),
    /// No route this tick.
    Stranded(Unreachable),
}

/// Plans a transport for `player` toward `destination`.
///
/// The landing zone is the closest shore on the whole map. The embarkation
/// tile depends on `config.embark_strategy`: the closest owned shore by
/// straight line, or the cheapest of the bounded candidate set by real route
/// cost.
pub fn plan_transport(
    map: &GameMap,
    territory: &Territory,
    cache: &mut ShoreTileCache,
    player: PlayerId,
    destination: TileRef,
    config: &RouteConfig,
) -> Result<TransportPlan, RouteError> {
    if !map.contains(destination) {
        return Err(RouteError::OutOfBounds(destination));
    }
    if territory.is_owned_by(destination, player) {
        return Err(RouteError::OwnTerritory {
            player,
            destination,
        });
    }

    let landing =
        target_transport_tile(map, destination).ok_or(RouteError::NoLandingZone(destination))?;
    // Landing on an owned shore would be a zero-length voyage.
    if territory.is_owned_by(landing, player) {
        return Err(RouteError::OwnLanding { player, landing });
    }
    let embark = match config.embark_strategy {
        EmbarkStrategy::Nearest => closest_shore_from_player(map, territory, cache, player, landing),
        EmbarkStrategy::Optimized => {
            best_shore_deployment_source(map, territory, cache, player, landing, config)
        }
    };
    let Some(embark) = embark else {
        debug!(
            player = player.0,
            landing = landing.raw(),
            strategy = ?config.embark_strategy,
            "transport refused: no embarkation tile"
        );
        return Err(RouteError::NoEmbarkation { player, landing });
    };

    Ok(TransportPlan {
        player,
        destination,
        landing,
        embark,
    })
}

/// Computes one movement tick from `current` toward `landing`.
pub fn transport_step(
    map: &GameMap,
    current: TileRef,
    landing: TileRef,
    config: &RouteConfig,
) -> TransportStep {
    match mini_search(map, current, landing, &config.step_params()) {
        PathResult::Found(route) => TransportStep::Land(route.next_tile().unwrap_or(landing)),
        PathResult::Pending { next, .. } => TransportStep::Advance(next),
        PathResult::Unreachable(reason) => TransportStep::Stranded(reason),
    }
}
