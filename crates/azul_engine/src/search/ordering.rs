//! Move ordering for negascout
//!
//! Good moves first means more cutoffs. Below the root, moves are ranked by the
//! evaluator's cheap `move_potential`. At the root, the order produced by the previous
//! iteration is reused when it covers the same move list.

use std::collections::HashMap;

use crate::evaluation::Evaluator;
use crate::types::Move;

/// Stable sort by `move_potential`, highest first
pub(crate) fn order_moves(moves: &mut [Move], evaluator: &dyn Evaluator) {
    moves.sort_by(|a, b| {
        evaluator
            .move_potential(b)
            .total_cmp(&evaluator.move_potential(a))
    });
}

/// Root ordering: follow `hint` when it ranks exactly this move list, else potential
pub(crate) fn order_root_moves(moves: &mut [Move], hint: &[Move], evaluator: &dyn Evaluator) {
    if hint.len() == moves.len() {
        let rank: HashMap<&Move, usize> = hint.iter().enumerate().map(|(i, mv)| (mv, i)).collect();
        if moves.iter().all(|mv| rank.contains_key(mv)) {
            moves.sort_by_key(|mv| rank.get(mv).copied().unwrap_or(usize::MAX));
            return;
        }
    }
    order_moves(moves, evaluator);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::PointsEvaluator;
    use crate::types::GameState;

    #[test]
    fn test_order_moves_by_potential() {
        let state = GameState::seeded(6);
        let mut moves = state.all_moves(0);
        order_moves(&mut moves, &PointsEvaluator);

        let potentials: Vec<f32> = moves
            .iter()
            .map(|mv| PointsEvaluator.move_potential(mv))
            .collect();
        assert!(
            potentials.windows(2).all(|pair| pair[0] >= pair[1]),
            "Potentials should be non-increasing"
        );
    }

    #[test]
    fn test_root_follows_matching_hint() {
        let state = GameState::seeded(6);
        let mut hint = state.all_moves(0);
        hint.reverse();

        let mut moves = state.all_moves(0);
        order_root_moves(&mut moves, &hint, &PointsEvaluator);
        assert_eq!(moves, hint);
    }

    #[test]
    fn test_root_ignores_mismatched_hint() {
        let state = GameState::seeded(6);
        let mut moves = state.all_moves(0);
        let hint = moves[..3].to_vec();

        order_root_moves(&mut moves, &hint, &PointsEvaluator);
        let mut expected = state.all_moves(0);
        order_moves(&mut expected, &PointsEvaluator);
        assert_eq!(moves, expected);
    }
}
