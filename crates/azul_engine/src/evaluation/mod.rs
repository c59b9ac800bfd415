//! Position evaluation
//!
//! Evaluators are injected into the search as trait objects, one per player, so two
//! different strategies can play against each other.
//!
//! ## Module Organization
//!
//! - `points` - Current score only
//! - `potential` - Points realized this round plus partial credit for open lines

mod points;
mod potential;

use std::fmt;
use std::str::FromStr;

use crate::constants::PLAYER_COUNT;
use crate::error::EngineError;
use crate::types::*;

pub use points::PointsEvaluator;
pub use potential::PotentialEvaluator;

/// Scores a player's position and estimates how promising a move looks
pub trait Evaluator: Send + Sync {
    /// Value of `player`'s position; `points` is that player's non-mutating scoring result
    fn player_evaluation(&self, state: &GameState, player: &Player, points: &PointsResult) -> f32;

    /// Rough promise of a move, used only to order moves before searching them
    fn move_potential(&self, mv: &Move) -> f32 {
        mv.amount as f32 - mv.floor_count as f32
    }
}

/// Player 0's evaluation minus player 1's, negated when player 1 is to move
pub fn game_evaluation_for_player(
    turn: usize,
    state: &GameState,
    results: &[PointsResult; PLAYER_COUNT],
    evaluator: &dyn Evaluator,
) -> f32 {
    let first = evaluator.player_evaluation(state, &state.players[0], &results[0]);
    let second = evaluator.player_evaluation(state, &state.players[1], &results[1]);
    let score = first - second;
    if turn == 0 {
        score
    } else {
        -score
    }
}

/// Built-in evaluators, selectable by name
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EvaluatorKind {
    Points,
    #[default]
    Potential,
}

impl EvaluatorKind {
    pub fn build(self) -> Box<dyn Evaluator> {
        match self {
            EvaluatorKind::Points => Box::new(PointsEvaluator),
            EvaluatorKind::Potential => Box::new(PotentialEvaluator),
        }
    }
}

impl FromStr for EvaluatorKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "points" | "v2" => Ok(EvaluatorKind::Points),
            "potential" | "v3" => Ok(EvaluatorKind::Potential),
            _ => Err(EngineError::UnknownEvaluator(s.to_string())),
        }
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluatorKind::Points => f.write_str("points"),
            EvaluatorKind::Potential => f.write_str("potential"),
        }
    }
}
