//! Public game-state API
//!
//! `GameState` methods grouped by concern. Everything here is safe to call from a
//! driver; the search uses the same methods on its working copy.
//!
//! ## Module Organization
//!
//! - `game` - Lifecycle (seeded, new_round, is_round_over, is_game_over)
//! - `moves` - Move generation, execution and undo (all_moves, make_move, undo_move)
//! - `state` - End-of-round scoring (calculate_points, calculate_points_and_modify)

mod game;
mod moves;
mod state;
