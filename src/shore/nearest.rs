//! Straight-line nearest-shore selection.
//!
//! Cheap O(n) pre-filter by Manhattan distance. True path cost is only
//! computed later by the deployment optimiser.

use crate::map::{GameMap, TileRef};
use crate::territory::{PlayerId, Territory};

use super::cache::ShoreTileCache;

/// Returns the candidate with minimum Manhattan distance to `target`.
///
/// The first candidate achieving the minimum wins. `None` when empty.
pub fn nearest_by_manhattan<I>(map: &GameMap, candidates: I, target: TileRef) -> Option<TileRef>
where
    I: IntoIterator<Item = TileRef>,
{
    let mut best: Option<(u32, TileRef)> = None;
    for tile in candidates {
        let d = map.manhattan(tile, target);
        match best {
            Some((best_d, _)) if best_d <= d => {}
            _ => best = Some((d, tile)),
        }
    }
    best.map(|(_, t)| t)
}

/// Picks the landing zone for a destination: the closest shore tile on the
/// whole map, regardless of who owns it.
pub fn target_transport_tile(map: &GameMap, target: TileRef) -> Option<TileRef> {
    nearest_by_manhattan(map, map.shore_tiles().iter().copied(), target)
}

/// Picks the closest shore tile the player owns on its border.
pub fn closest_shore_from_player(
    map: &GameMap,
    territory: &Territory,
    cache: &mut ShoreTileCache,
    player: PlayerId,
    target: TileRef,
) -> Option<TileRef> {
    let shores = cache.shore_tiles(map, territory, player);
    nearest_by_manhattan(map, shores.iter().copied(), target)
}
