//! Tile ownership and per-player border sets.
//!
//! A border tile is an owned tile with at least one in-bounds 4-neighbour
//! that the same player does not own. Every ownership mutation reports each
//! player whose border set may have changed to a `TerritoryObserver` before
//! returning, so derived views never observe a half-applied change.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::map::{Connectivity, GameMap, TileRef};

/// Identifier of a player (nation) that can own tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u16);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receives ownership-change signals.
pub trait TerritoryObserver {
    /// Called for every player whose border set may have changed.
    fn territory_changed(&mut self, player: PlayerId);
}

/// Observer that ignores every signal.
impl TerritoryObserver for () {
    fn territory_changed(&mut self, _player: PlayerId) {}
}

/// Ownership of every tile plus the derived border sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    owner: Vec<Option<PlayerId>>,
    borders: BTreeMap<PlayerId, BTreeSet<TileRef>>,
    owned: BTreeMap<PlayerId, usize>,
}

impl Territory {
    /// Creates an unowned territory sized for `map`.
    pub fn new(map: &GameMap) -> Self {
        Territory {
            owner: vec![None; map.tile_count()],
            borders: BTreeMap::new(),
            owned: BTreeMap::new(),
        }
    }

    /// Returns the owner of a tile, or `None` if unowned or out of range.
    pub fn owner(&self, tile: TileRef) -> Option<PlayerId> {
        self.owner.get(tile.index()).copied().flatten()
    }

    pub fn is_owned_by(&self, tile: TileRef, player: PlayerId) -> bool {
        self.owner(tile) == Some(player)
    }

    /// Number of tiles the player owns.
    pub fn tiles_owned(&self, player: PlayerId) -> usize {
        self.owned.get(&player).copied().unwrap_or(0)
    }

    /// Players owning at least one tile, ascending.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.owned
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(&p, _)| p)
    }

    /// The player's border tiles in ascending `TileRef` order.
    pub fn border_tiles(&self, player: PlayerId) -> impl Iterator<Item = TileRef> + '_ {
        self.borders.get(&player).into_iter().flatten().copied()
    }

    pub fn is_border(&self, player: PlayerId, tile: TileRef) -> bool {
        self.borders
            .get(&player)
            .is_some_and(|set| set.contains(&tile))
    }

    /// Transfers a land tile to `player`.
    ///
    /// Returns false (and signals nothing) if the tile is outside the map or
    /// outside the range this territory was sized for, is water, or already
    /// belongs to `player`. Otherwise the new owner and the
    /// previous owner, if any, are reported to `observer`.
    pub fn conquer<O>(
        &mut self,
        map: &GameMap,
        tile: TileRef,
        player: PlayerId,
        observer: &mut O,
    ) -> bool
    where
        O: TerritoryObserver + ?Sized,
    {
        if !self.in_range(map, tile) || !map.is_land(tile) || self.is_owned_by(tile, player) {
            return false;
        }
        let previous = self.set_owner(map, tile, Some(player));
        observer.territory_changed(player);
        if let Some(prev) = previous {
            observer.territory_changed(prev);
        }
        true
    }

    /// Releases a tile back to no owner.
    ///
    /// Returns false if the tile was unowned or out of range.
    pub fn relinquish<O>(&mut self, map: &GameMap, tile: TileRef, observer: &mut O) -> bool
    where
        O: TerritoryObserver + ?Sized,
    {
        if !self.in_range(map, tile) {
            return false;
        }
        match self.set_owner(map, tile, None) {
            Some(prev) => {
                observer.territory_changed(prev);
                true
            }
            None => false,
        }
    }

    /// True if the tile lies on `map` and inside this territory's owner table.
    fn in_range(&self, map: &GameMap, tile: TileRef) -> bool {
        map.contains(tile) && tile.index() < self.owner.len()
    }

    /// Writes the new owner and repairs border membership around the tile.
    /// Returns the previous owner.
    fn set_owner(&mut self, map: &GameMap, tile: TileRef, owner: Option<PlayerId>) -> Option<PlayerId> {
        let slot = self.owner.get_mut(tile.index())?;
        let previous = std::mem::replace(slot, owner);
        if let Some(prev) = previous {
            if let Some(n) = self.owned.get_mut(&prev) {
                *n -= 1;
            }
            if let Some(set) = self.borders.get_mut(&prev) {
                set.remove(&tile);
            }
        }
        if let Some(p) = owner {
            *self.owned.entry(p).or_insert(0) += 1;
        }

        self.refresh_border(map, tile);
        let around: Vec<TileRef> = map.neighbors(tile, Connectivity::Four).collect();
        for n in around {
            self.refresh_border(map, n);
        }
        previous
    }

    fn refresh_border(&mut self, map: &GameMap, tile: TileRef) {
        let Some(player) = self.owner(tile) else {
            return;
        };
        let on_border = map
            .neighbors(tile, Connectivity::Four)
            .any(|n| self.owner(n) != Some(player));
        let set = self.borders.entry(player).or_default();
        if on_border {
            set.insert(tile);
        } else {
            set.remove(&tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every signal in order.
    #[derive(Default)]
    struct Recorder(Vec<PlayerId>);

    impl TerritoryObserver for Recorder {
        fn territory_changed(&mut self, player: PlayerId) {
            self.0.push(player);
        }
    }

    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    fn land(w: u32, h: u32) -> GameMap {
        GameMap::from_fn(w, h, |_, _| crate::map::Terrain::Land).unwrap()
    }

    #[test]
    fn single_tile_is_border() {
        let map = land(3, 3);
        let mut t = Territory::new(&map);
        let c = map.tile_at(1, 1).unwrap();
        assert!(t.conquer(&map, c, P1, &mut ()));
        assert_eq!(t.owner(c), Some(P1));
        assert_eq!(t.border_tiles(P1).collect::<Vec<_>>(), vec![c]);
        assert_eq!(t.tiles_owned(P1), 1);
    }

    #[test]
    fn full_block_interior_is_not_border() {
        let map = land(3, 3);
        let mut t = Territory::new(&map);
        for y in 0..3 {
            for x in 0..3 {
                t.conquer(&map, map.tile_at(x, y).unwrap(), P1, &mut ());
            }
        }
        // Map edges do not count as foreign neighbours.
        assert_eq!(t.border_tiles(P1).count(), 0);

        // Losing the centre turns its four neighbours into border tiles.
        let c = map.tile_at(1, 1).unwrap();
        assert!(t.relinquish(&map, c, &mut ()));
        let border: Vec<(u32, u32)> = t.border_tiles(P1).map(|b| map.coords(b)).collect();
        assert_eq!(border, vec![(1, 0), (0, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn conquest_signals_both_players() {
        let map = land(2, 1);
        let mut t = Territory::new(&map);
        let a = map.tile_at(0, 0).unwrap();
        let b = map.tile_at(1, 0).unwrap();
        let mut rec = Recorder::default();
        t.conquer(&map, a, P1, &mut rec);
        t.conquer(&map, b, P1, &mut rec);
        t.conquer(&map, b, P2, &mut rec);
        assert_eq!(rec.0, vec![P1, P1, P2, P1]);
        assert!(t.is_border(P1, a));
        assert!(t.is_border(P2, b));
        assert_eq!(t.players().collect::<Vec<_>>(), vec![P1, P2]);
    }

    #[test]
    fn rejected_mutations_signal_nothing() {
        let map = GameMap::parse("#~").unwrap();
        let mut t = Territory::new(&map);
        let mut rec = Recorder::default();
        let land_tile = map.tile_at(0, 0).unwrap();
        let water = map.tile_at(1, 0).unwrap();
        assert!(!t.conquer(&map, water, P1, &mut rec));
        assert!(!t.relinquish(&map, land_tile, &mut rec));
        assert!(t.conquer(&map, land_tile, P1, &mut rec));
        assert!(!t.conquer(&map, land_tile, P1, &mut rec));
        assert!(!t.conquer(&map, TileRef::new(99), P1, &mut rec));
        assert_eq!(rec.0, vec![P1]);
    }

    #[test]
    fn relinquish_last_tile_empties_player() {
        let map = land(2, 2);
        let mut t = Territory::new(&map);
        let a = map.tile_at(0, 0).unwrap();
        t.conquer(&map, a, P1, &mut ());
        t.relinquish(&map, a, &mut ());
        assert_eq!(t.tiles_owned(P1), 0);
        assert_eq!(t.border_tiles(P1).count(), 0);
        assert_eq!(t.players().count(), 0);
    }

    #[test]
    fn tiles_beyond_the_owner_table_are_rejected() {
        let small = GameMap::parse("#~").unwrap();
        let large = GameMap::parse("####/####").unwrap();
        let mut t = Territory::new(&small);
        let mut rec = Recorder::default();
        let far = large.tile_at(3, 1).unwrap();
        assert!(!t.conquer(&large, far, P1, &mut rec));
        assert!(!t.relinquish(&large, far, &mut rec));
        assert_eq!(t.owner(far), None);
        assert_eq!(t.tiles_owned(P1), 0);
        assert!(rec.0.is_empty());

        // Tiles inside both still work, and the border check skips neighbours
        // the table does not cover.
        let corner = large.tile_at(0, 0).unwrap();
        assert!(t.conquer(&large, corner, P1, &mut rec));
        assert_eq!(t.border_tiles(P1).collect::<Vec<_>>(), vec![corner]);
        assert_eq!(rec.0, vec![P1]);
    }
}
