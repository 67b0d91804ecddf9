//! Bounded water-route search.
//!
//! `mini_search` is the shared low-level engine behind transport movement
//! and deployment ranking.

pub mod frontier;
pub mod mini;

pub use mini::{
    mini_search, PathResult, Route, SearchMode, SearchParams, Unreachable, OFFSHORE_MARGIN,
    OFFSHORE_PENALTY,
};
