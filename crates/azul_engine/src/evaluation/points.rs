//! Score-only evaluation
//!
//! Values a position by the points already banked. Cheap, and blind to anything
//! that has not been scored yet.

use super::Evaluator;
use crate::types::*;

#[derive(Copy, Clone, Debug, Default)]
pub struct PointsEvaluator;

impl Evaluator for PointsEvaluator {
    fn player_evaluation(&self, _state: &GameState, player: &Player, _points: &PointsResult) -> f32 {
        player.points as f32
    }
}
