//! Rectangular terrain grid.
//!
//! Terrain is fixed once the map is built, so classification, the map-wide
//! shore list and each water tile's distance to land are computed up front
//! and every query afterwards is a slice lookup.

use std::collections::VecDeque;

use thiserror::Error;

use super::tile::{Connectivity, Terrain, TileClass, TileRef};

/// Distance reported for water tiles with no land anywhere on the map.
pub const UNBOUNDED_LAND_DISTANCE: u8 = u8::MAX;

/// Errors that can occur when building a map.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no tiles")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown terrain glyph '{glyph}' at {x},{y}")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    #[error("map of {width}x{height} tiles exceeds the addressable tile count")]
    TooLarge { width: usize, height: usize },
}

/// Static terrain for one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMap {
    width: u32,
    height: u32,
    terrain: Vec<Terrain>,
    class: Vec<TileClass>,
    land_distance: Vec<u8>,
    shores: Vec<TileRef>,
}

impl GameMap {
    /// Builds a map by asking `terrain_at(x, y)` for every cell.
    pub fn from_fn<F>(width: u32, height: u32, mut terrain_at: F) -> Result<Self, MapError>
    where
        F: FnMut(u32, u32) -> Terrain,
    {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        let count = u64::from(width) * u64::from(height);
        if count > u64::from(u32::MAX) {
            return Err(MapError::TooLarge {
                width: width as usize,
                height: height as usize,
            });
        }

        let mut terrain = Vec::with_capacity(count as usize);
        for y in 0..height {
            for x in 0..width {
                terrain.push(terrain_at(x, y));
            }
        }
        Ok(Self::from_terrain(width, height, terrain))
    }

    /// Parses map notation: rows of `#` (land) and `~` (water), separated by
    /// `/` or newlines. Blank rows are skipped.
    pub fn parse(notation: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = notation
            .split(|c: char| c == '/' || c == '\n')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(MapError::Empty);
        }

        let width = rows[0].chars().count();
        let height = rows.len();
        if (width as u64) * (height as u64) > u64::from(u32::MAX) {
            return Err(MapError::TooLarge { width, height });
        }

        let mut terrain = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let t = Terrain::from_glyph(glyph).ok_or(MapError::UnknownGlyph { glyph, x, y })?;
                terrain.push(t);
            }
        }
        Ok(Self::from_terrain(width as u32, height as u32, terrain))
    }

    /// Encodes the map back into `/`-separated notation.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.terrain.len() + self.height as usize);
        for (i, row) in self.terrain.chunks(self.width as usize).enumerate() {
            if i > 0 {
                out.push('/');
            }
            out.extend(row.iter().map(|t| t.glyph()));
        }
        out
    }

    fn from_terrain(width: u32, height: u32, terrain: Vec<Terrain>) -> Self {
        let mut map = GameMap {
            width,
            height,
            terrain,
            class: Vec::new(),
            land_distance: Vec::new(),
            shores: Vec::new(),
        };
        map.class = (0..map.tile_count())
            .map(|i| map.derive_class(TileRef::new(i as u32)))
            .collect();
        map.shores = (0..map.tile_count())
            .map(|i| TileRef::new(i as u32))
            .filter(|&t| map.class[t.index()].is_shore())
            .collect();
        map.land_distance = map.compute_land_distance();
        map
    }

    fn derive_class(&self, tile: TileRef) -> TileClass {
        match self.terrain[tile.index()] {
            Terrain::Water => TileClass::Water,
            Terrain::Land => {
                let touches_water = self
                    .neighbors(tile, Connectivity::Four)
                    .any(|n| self.terrain[n.index()] == Terrain::Water);
                if touches_water {
                    TileClass::Shore
                } else {
                    TileClass::Land
                }
            }
        }
    }

    /// Multi-source BFS from every land tile, 4-connected, saturating at
    /// `UNBOUNDED_LAND_DISTANCE`.
    fn compute_land_distance(&self) -> Vec<u8> {
        let mut dist = vec![UNBOUNDED_LAND_DISTANCE; self.tile_count()];
        let mut queue = VecDeque::new();
        for (i, t) in self.terrain.iter().enumerate() {
            if *t == Terrain::Land {
                dist[i] = 0;
                queue.push_back(TileRef::new(i as u32));
            }
        }
        while let Some(tile) = queue.pop_front() {
            let next = dist[tile.index()].saturating_add(1);
            for n in self.neighbors(tile, Connectivity::Four) {
                if dist[n.index()] == UNBOUNDED_LAND_DISTANCE && next < UNBOUNDED_LAND_DISTANCE {
                    dist[n.index()] = next;
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.terrain.len()
    }

    /// Returns the tile at `(x, y)`, or `None` outside the map.
    pub fn tile_at(&self, x: u32, y: u32) -> Option<TileRef> {
        if x < self.width && y < self.height {
            Some(TileRef::new(y * self.width + x))
        } else {
            None
        }
    }

    /// Returns whether the reference addresses a cell of this map.
    pub fn contains(&self, tile: TileRef) -> bool {
        tile.index() < self.terrain.len()
    }

    pub fn x(&self, tile: TileRef) -> u32 {
        tile.raw() % self.width
    }

    pub fn y(&self, tile: TileRef) -> u32 {
        tile.raw() / self.width
    }

    pub fn coords(&self, tile: TileRef) -> (u32, u32) {
        (self.x(tile), self.y(tile))
    }

    /// Formats a tile as `x,y`.
    pub fn format_tile(&self, tile: TileRef) -> String {
        let (x, y) = self.coords(tile);
        format!("{},{}", x, y)
    }

    /// Raw terrain. The tile must belong to this map.
    pub fn terrain(&self, tile: TileRef) -> Terrain {
        self.terrain[tile.index()]
    }

    /// Classification. The tile must belong to this map.
    pub fn classify(&self, tile: TileRef) -> TileClass {
        self.class[tile.index()]
    }

    pub fn is_water(&self, tile: TileRef) -> bool {
        self.classify(tile).is_water()
    }

    pub fn is_shore(&self, tile: TileRef) -> bool {
        self.classify(tile).is_shore()
    }

    pub fn is_land(&self, tile: TileRef) -> bool {
        self.terrain(tile) == Terrain::Land
    }

    /// Steps from a water tile to the nearest land tile (0 on land).
    pub fn land_distance(&self, tile: TileRef) -> u8 {
        self.land_distance[tile.index()]
    }

    /// Every shore tile on the map, ascending.
    pub fn shore_tiles(&self) -> &[TileRef] {
        &self.shores
    }

    pub fn manhattan(&self, a: TileRef, b: TileRef) -> u32 {
        let (ax, ay) = self.coords(a);
        let (bx, by) = self.coords(b);
        ax.abs_diff(bx) + ay.abs_diff(by)
    }

    pub fn chebyshev(&self, a: TileRef, b: TileRef) -> u32 {
        let (ax, ay) = self.coords(a);
        let (bx, by) = self.coords(b);
        ax.abs_diff(bx).max(ay.abs_diff(by))
    }

    /// In-bounds neighbours of `tile` in the fixed order N, E, S, W
    /// (then NE, SE, SW, NW for eight-way connectivity).
    pub fn neighbors(
        &self,
        tile: TileRef,
        connectivity: Connectivity,
    ) -> impl Iterator<Item = TileRef> + '_ {
        let (x, y) = self.coords(tile);
        connectivity.offsets().iter().filter_map(move |&(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            self.tile_at(nx, ny)
        })
    }
}
