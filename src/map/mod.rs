//! Grid map: tile addressing, terrain classification and distances.
//!
//! `GameMap` answers every terrain question the routing code asks:
//! classification, Manhattan distance, neighbours and bounds.

pub mod grid;
pub mod tile;

pub use grid::{GameMap, MapError, UNBOUNDED_LAND_DISTANCE};
pub use tile::{Connectivity, ConnectivityError, Terrain, TileClass, TileRef};
