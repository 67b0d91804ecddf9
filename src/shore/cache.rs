//! Per-player shore-tile cache.
//!
//! Holds, for each player, the border tiles that are shores. Entries are
//! filled lazily on first read and dropped to `Stale` by the territory's
//! ownership-change signal, so a `Valid` entry always equals the filtered
//! border set.

use std::collections::HashMap;

use tracing::trace;

use crate::map::{GameMap, TileRef};
use crate::territory::{PlayerId, Territory, TerritoryObserver};

/// Cache state for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShoreEntry {
    Valid(Vec<TileRef>),
    Stale,
}

/// Lazily rebuilt shore tiles per player.
#[derive(Debug, Clone, Default)]
pub struct ShoreTileCache {
    entries: HashMap<PlayerId, ShoreEntry>,
    rebuilds: u64,
}

impl ShoreTileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the player's shore border tiles in border traversal order,
    /// re-filtering the border set only if the entry is stale.
    pub fn shore_tiles(
        &mut self,
        map: &GameMap,
        territory: &Territory,
        player: PlayerId,
    ) -> &[TileRef] {
        let entry = self.entries.entry(player).or_insert(ShoreEntry::Stale);
        if let ShoreEntry::Stale = entry {
            let tiles: Vec<TileRef> = territory
                .border_tiles(player)
                .filter(|&t| map.is_shore(t))
                .collect();
            trace!(player = player.0, shores = tiles.len(), "shore cache rebuilt");
            self.rebuilds += 1;
            *entry = ShoreEntry::Valid(tiles);
        }
        match entry {
            ShoreEntry::Valid(tiles) => tiles.as_slice(),
            ShoreEntry::Stale => &[],
        }
    }

    /// Marks the player's entry stale.
    pub fn invalidate(&mut self, player: PlayerId) {
        if let Some(entry) = self.entries.get_mut(&player) {
            *entry = ShoreEntry::Stale;
        }
    }

    /// Marks every entry stale.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Returns whether the player's entry can be served without re-filtering.
    pub fn is_valid(&self, player: PlayerId) -> bool {
        matches!(self.entries.get(&player), Some(ShoreEntry::Valid(_)))
    }

    /// Number of times any entry has been re-filtered.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

impl TerritoryObserver for ShoreTileCache {
    fn territory_changed(&mut self, player: PlayerId) {
        self.invalidate(player);
    }
}
