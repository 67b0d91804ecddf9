//! Embarkation candidate generation.
//!
//! Picks a bounded, spread-out subset of a player's shore tiles for the
//! expensive path evaluation, so the number of searches stays constant no
//! matter how long the coastline is.

use crate::map::{GameMap, TileRef};
use crate::territory::{PlayerId, Territory};

use super::cache::ShoreTileCache;

/// Slots reserved for the westmost, northmost, eastmost and southmost shores.
pub const EXTREMA_SLOTS: usize = 4;

/// Returns the player's embarkation candidates toward `target`.
///
/// See [`select_candidates`] for the selection rule.
pub fn candidate_shore_tiles(
    map: &GameMap,
    territory: &Territory,
    cache: &mut ShoreTileCache,
    player: PlayerId,
    target: TileRef,
    max_candidates: usize,
) -> Vec<TileRef> {
    let shores = cache.shore_tiles(map, territory, player);
    select_candidates(map, shores, target, max_candidates)
}

/// Selects at most `max_candidates` (minimum 1) tiles from `shores`.
///
/// When everything fits, every shore is returned. Otherwise up to
/// `EXTREMA_SLOTS` slots go to the coastline's extreme tiles and the rest to
/// the tiles nearest `target`. The result is ordered by
/// `(manhattan distance, position in shores)`, so its first element is the
/// tile `nearest_by_manhattan` would choose.
pub fn select_candidates(
    map: &GameMap,
    shores: &[TileRef],
    target: TileRef,
    max_candidates: usize,
) -> Vec<TileRef> {
    let cap = max_candidates.max(1);
    // Unique per position, so unstable sorts and selection stay deterministic.
    let key = |i: usize| (map.manhattan(shores[i], target), i);

    if shores.len() <= cap {
        let mut order: Vec<usize> = (0..shores.len()).collect();
        order.sort_unstable_by_key(|&i| key(i));
        return order.into_iter().map(|i| shores[i]).collect();
    }

    let reserved = EXTREMA_SLOTS.min(cap - 1);
    let mut picked: Vec<usize> = Vec::with_capacity(cap);
    for i in extreme_positions(map, shores) {
        if picked.len() == reserved {
            break;
        }
        if !picked.contains(&i) {
            picked.push(i);
        }
    }

    // Enough nearest tiles to fill the cap even if every extreme repeats.
    let want = (cap + picked.len()).min(shores.len());
    let mut ranked: Vec<usize> = (0..shores.len()).collect();
    if want < ranked.len() {
        ranked.select_nth_unstable_by_key(want, |&i| key(i));
        ranked.truncate(want);
    }
    ranked.sort_unstable_by_key(|&i| key(i));
    for i in ranked {
        if picked.len() == cap {
            break;
        }
        if !picked.contains(&i) {
            picked.push(i);
        }
    }

    picked.sort_unstable_by_key(|&i| key(i));
    picked.into_iter().map(|i| shores[i]).collect()
}

/// Positions of the first min-x, min-y, max-x and max-y tiles.
fn extreme_positions(map: &GameMap, shores: &[TileRef]) -> [usize; EXTREMA_SLOTS] {
    let mut ext = [0usize; EXTREMA_SLOTS];
    for (i, &tile) in shores.iter().enumerate().skip(1) {
        let (x, y) = map.coords(tile);
        if x < map.x(shores[ext[0]]) {
            ext[0] = i;
        }
        if y < map.y(shores[ext[1]]) {
            ext[1] = i;
        }
        if x > map.x(shores[ext[2]]) {
            ext[2] = i;
        }
        if y > map.y(shores[ext[3]]) {
            ext[3] = i;
        }
    }
    ext
}
