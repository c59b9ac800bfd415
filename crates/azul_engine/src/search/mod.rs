//! Negascout search with iterative deepening
//!
//! This module implements the engine's move search using:
//! - Negascout (principal variation search) over a shared working state
//! - Iterative deepening for time management
//! - Root move ordering carried from one depth to the next
//! - An optional per-search transposition table
//!
//! ## Module Organization
//!
//! - `negascout` - Core recursive search
//! - `iterative` - Iterative deepening driver
//! - `ordering` - Move ordering heuristics
//! - `options` - Settings, cancellation and progress events

mod iterative;
mod negascout;
mod options;
mod ordering;

pub use iterative::{get_best_move, search_fixed_depth};
pub use options::{CancelToken, SearchEvent, SearchOptions, SearchResult};
