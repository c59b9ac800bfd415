//! Round-aware evaluation
//!
//! Banked points plus what the current round would add if it ended now (completed lines,
//! bonuses, floor penalty), plus partial credit for lines still being filled.
//! A line that would score more once placed is worth more, and the credit shrinks
//! with the number of tiles it still needs.

use super::Evaluator;
use crate::types::*;

#[derive(Copy, Clone, Debug, Default)]
pub struct PotentialEvaluator;

/// Credit for an incomplete line that would score `points` once finished
fn future_line_score(change: &PointChange) -> f32 {
    if change.completed {
        return 0.0;
    }

    let score = match change.points {
        // Isolated placements are barely worth chasing
        1 => return 0.01,
        2 => 0.6,
        3 => 1.2,
        4 => 1.8,
        5 => 2.5,
        _ => 3.0,
    };
    score / change.space_left.max(1) as f32
}

impl Evaluator for PotentialEvaluator {
    fn player_evaluation(&self, _state: &GameState, player: &Player, points: &PointsResult) -> f32 {
        let future: f32 = points.point_changes.iter().map(future_line_score).sum();
        player.points as f32 + points.realized_points() as f32 + future
    }
}
