//! Tile references, raw terrain and derived classification.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An opaque handle to one grid cell.
///
/// Wraps the row-major index into the `GameMap` that issued it. Ordering
/// follows the index and is the traversal order used for every tile set in
/// the crate, which keeps distance tie-breaks reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileRef(u32);

impl TileRef {
    /// Creates a reference from a raw row-major index.
    pub const fn new(index: u32) -> Self {
        TileRef(index)
    }

    /// Returns the row-major index, usable directly as a slice index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw index value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw terrain of a cell, as written in map notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Land,
    Water,
}

impl Terrain {
    /// Returns the map-notation glyph.
    pub const fn glyph(self) -> char {
        match self {
            Terrain::Land => '#',
            Terrain::Water => '~',
        }
    }

    /// Parses a terrain from its map-notation glyph.
    pub fn from_glyph(c: char) -> Option<Terrain> {
        match c {
            '#' => Some(Terrain::Land),
            '~' => Some(Terrain::Water),
            _ => None,
        }
    }
}

/// Classification of a tile.
///
/// `Shore` is land with at least one 4-neighbour of water. It depends only on
/// terrain, never on ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileClass {
    Land,
    Water,
    Shore,
}

impl TileClass {
    pub const fn is_water(self) -> bool {
        matches!(self, TileClass::Water)
    }

    pub const fn is_shore(self) -> bool {
        matches!(self, TileClass::Shore)
    }
}

/// Error returned when a connectivity value is neither 4 nor 8.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("connectivity must be 4 or 8, got {0}")]
pub struct ConnectivityError(pub u8);

/// Which neighbours count as adjacent for movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Connectivity {
    /// Orthogonal neighbours only.
    #[default]
    Four,
    /// Orthogonal and diagonal neighbours.
    Eight,
}

impl Connectivity {
    /// Offsets in the fixed expansion order: N, E, S, W, then NE, SE, SW, NW.
    pub(crate) fn offsets(self) -> &'static [(i32, i32)] {
        const OFFSETS: [(i32, i32); 8] = [
            (0, -1),
            (1, 0),
            (0, 1),
            (-1, 0),
            (1, -1),
            (1, 1),
            (-1, 1),
            (-1, -1),
        ];
        match self {
            Connectivity::Four => &OFFSETS[..4],
            Connectivity::Eight => &OFFSETS,
        }
    }
}

impl TryFrom<u8> for Connectivity {
    type Error = ConnectivityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Connectivity::Four),
            8 => Ok(Connectivity::Eight),
            other => Err(ConnectivityError(other)),
        }
    }
}

impl From<Connectivity> for u8 {
    fn from(c: Connectivity) -> u8 {
        match c {
            Connectivity::Four => 4,
            Connectivity::Eight => 8,
        }
    }
}
