//! seaway: transport embarkation and water routing on a tile grid.
//!
//! Chooses where a naval transport lands and where it departs from, and
//! moves it across water with a node-budgeted A* search. Exposes the map,
//! territory, shore selection, search and façade modules for the console
//! binary and integration tests.

pub mod config;
pub mod engine;
pub mod map;
pub mod protocol;
pub mod search;
pub mod shore;
pub mod territory;
pub mod transport;
pub mod world;

pub use config::{ConfigError, EmbarkStrategy, RouteConfig};
pub use map::{GameMap, TileRef};
pub use territory::{PlayerId, Territory};
pub use world::World;
