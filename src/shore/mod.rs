//! Shore tiles: the per-player cache and the straight-line selectors built
//! on it.

pub mod cache;
pub mod candidates;
pub mod nearest;

pub use cache::ShoreTileCache;
pub use candidates::{candidate_shore_tiles, select_candidates, EXTREMA_SLOTS};
pub use nearest::{closest_shore_from_player, nearest_by_manhattan, target_transport_tile};
