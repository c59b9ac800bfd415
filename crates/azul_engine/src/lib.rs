//! Azul duel engine
//!
//! Rules engine and computer opponent for the two-player tile-drafting game. The
//! crate covers move generation with exact undo, end-of-round scoring, canonical
//! position encoding, JSON snapshots, pluggable evaluation and a negascout search
//! with iterative deepening.
//!
//! ```rust,ignore
//! use azul_engine::{get_best_move, GameState, PotentialEvaluator, SearchOptions};
//!
//! let mut state = GameState::seeded(0);
//! let result = get_best_move(&PotentialEvaluator, &PotentialEvaluator, &state, 0, &SearchOptions::default())?;
//! state.make_move(0, &result.best_move)?;
//! ```

mod api;
pub mod bitset;
pub mod board;
pub mod constants;
mod display;
pub mod error;
pub mod evaluation;
pub mod hash;
pub mod move_gen;
pub mod search;
pub mod snapshot;
pub mod types;

pub use bitset::Wall;
pub use error::{EngineError, EngineResult};
pub use evaluation::{
    game_evaluation_for_player, Evaluator, EvaluatorKind, PointsEvaluator, PotentialEvaluator,
};
pub use hash::TranspositionTable;
pub use search::{
    get_best_move, search_fixed_depth, CancelToken, SearchEvent, SearchOptions, SearchResult,
};
pub use snapshot::Snapshot;
pub use types::{
    BonusFlags, CenterPile, FloorTile, GameState, Move, PatternLine, Player, PointChange,
    PointsResult, ScoringMode, Source, Tile, TileCounts,
};
