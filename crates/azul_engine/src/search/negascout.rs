//! Negascout (principal variation search)
//!
//! Recursive negamax over one shared working state, applying and undoing moves in
//! place. The first child of every node is searched with the full window; later
//! children get a null window `[alpha, alpha + 1]` and are re-searched only when they
//! land strictly inside `(alpha, beta)`. Recursion depth is bounded by the number of
//! draws left in the round.

use crossbeam_channel::Sender;
use web_time::Instant;

use super::options::{CancelToken, SearchEvent};
use super::ordering::{order_moves, order_root_moves};
use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::evaluation::{game_evaluation_for_player, Evaluator};
use crate::hash::{Probe, TranspositionTable};
use crate::types::*;

/// Node counters accumulated across iterations
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SearchStats {
    pub nodes: u64,
    pub leaf_evaluations: u64,
    pub tt_hits: u64,
    pub cutoffs: u64,
}

/// Result of one root pass
#[derive(Clone, Debug)]
pub(crate) struct RootOutcome {
    pub best_move: Move,
    pub score: f32,
    /// Root moves sorted by score, empty when the pass was interrupted
    pub move_order: Vec<Move>,
    pub completed: bool,
    /// Some leaf was cut off by the depth limit rather than the end of the round
    pub depth_limited: bool,
}

pub(crate) struct Searcher<'a> {
    evaluator: &'a dyn Evaluator,
    table: Option<&'a mut TranspositionTable>,
    deadline: Option<Instant>,
    cancel: Option<&'a CancelToken>,
    progress: Option<&'a Sender<SearchEvent>>,
    pub stats: SearchStats,
    aborted: bool,
    depth_limited: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(evaluator: &'a dyn Evaluator, table: Option<&'a mut TranspositionTable>) -> Self {
        Searcher {
            evaluator,
            table,
            deadline: None,
            cancel: None,
            progress: None,
            stats: SearchStats::default(),
            aborted: false,
            depth_limited: false,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_cancel(mut self, cancel: Option<&'a CancelToken>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: Option<&'a Sender<SearchEvent>>) -> Self {
        self.progress = progress;
        self
    }

    fn should_stop(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn send(&self, event: SearchEvent) {
        if let Some(progress) = self.progress {
            // Receiver may have gone away; the search result is still returned
            let _ = progress.send(event);
        }
    }

    /// Search every root move to `depth` and rank them
    ///
    /// # Errors
    ///
    /// [`EngineError::NoLegalMoves`] when `turn` has nothing to draw, or an
    /// [`EngineError::InvalidMove`] if apply/undo ever disagree with the state.
    pub fn search_root(
        &mut self,
        state: &mut GameState,
        turn: usize,
        depth: u32,
        hint: &[Move],
    ) -> EngineResult<RootOutcome> {
        let mut moves = state.all_moves(turn);
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves { player: turn });
        }
        order_root_moves(&mut moves, hint, self.evaluator);

        let depth = depth.max(1);
        self.stats.nodes += 1;
        self.aborted = false;
        self.depth_limited = false;

        let mut alpha = -SCORE_INF;
        let beta = SCORE_INF;
        let mut best_move = moves[0];
        let mut best_score = -SCORE_INF;
        let mut scored: Vec<(Move, f32)> = Vec::with_capacity(moves.len());

        for (index, mv) in moves.iter().enumerate() {
            state.make_move(turn, mv)?;
            let score = self.search_child(state, turn, depth, alpha, beta, index == 0)?;
            state.undo_move(turn, mv)?;

            if self.aborted {
                break;
            }

            scored.push((*mv, score));
            if score > best_score {
                best_move = *mv;
                best_score = score;
            }
            alpha = alpha.max(score);

            self.send(SearchEvent::RootMoveEvaluated {
                depth,
                mv: *mv,
                score,
                best_move,
                best_score,
            });

            if self.should_stop() {
                self.aborted = true;
                break;
            }
        }

        if self.aborted {
            return Ok(RootOutcome {
                best_move,
                score: best_score,
                move_order: Vec::new(),
                completed: false,
                depth_limited: self.depth_limited,
            });
        }

        // Stable: equal scores keep their searched order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(RootOutcome {
            best_move,
            score: best_score,
            move_order: scored.into_iter().map(|(mv, _)| mv).collect(),
            completed: true,
            depth_limited: self.depth_limited,
        })
    }

    /// Score one child (already applied) from the parent's point of view
    fn search_child(
        &mut self,
        state: &mut GameState,
        turn: usize,
        depth: u32,
        alpha: f32,
        beta: f32,
        first: bool,
    ) -> EngineResult<f32> {
        let next = 1 - turn;
        if first {
            return Ok(-self.negascout(state, next, depth - 1, -beta, -alpha)?);
        }

        let mut score = -self.negascout(state, next, depth - 1, -alpha - 1.0, -alpha)?;
        if !self.aborted && alpha < score && score < beta {
            score = -self.negascout(state, next, depth - 1, -beta, -alpha)?;
        }
        Ok(score)
    }

    fn evaluate_leaf(&mut self, state: &GameState, turn: usize) -> f32 {
        self.stats.leaf_evaluations += 1;
        let results = state.calculate_points(ScoringMode::Normal);
        game_evaluation_for_player(turn, state, &results, self.evaluator)
    }

    fn negascout(
        &mut self,
        state: &mut GameState,
        turn: usize,
        depth: u32,
        mut alpha: f32,
        mut beta: f32,
    ) -> EngineResult<f32> {
        self.stats.nodes += 1;

        if state.is_round_over() {
            return Ok(self.evaluate_leaf(state, turn));
        }
        if depth == 0 {
            self.depth_limited = true;
            return Ok(self.evaluate_leaf(state, turn));
        }

        let alpha_orig = alpha;
        let key = match self.table.as_deref() {
            Some(table) => {
                let key = TranspositionTable::key(state, turn);
                match table.probe(&key, depth, alpha, beta) {
                    Probe::Cutoff(score) => {
                        self.stats.tt_hits += 1;
                        // Stored subtree may have been cut by depth
                        self.depth_limited = true;
                        return Ok(score);
                    }
                    Probe::Window {
                        alpha: narrowed_alpha,
                        beta: narrowed_beta,
                    } => {
                        self.stats.tt_hits += 1;
                        alpha = narrowed_alpha;
                        beta = narrowed_beta;
                    }
                    Probe::Miss => {}
                }
                Some(key)
            }
            None => None,
        };

        let mut moves = state.all_moves(turn);
        order_moves(&mut moves, self.evaluator);

        let mut best = -SCORE_INF;
        for (index, mv) in moves.iter().enumerate() {
            state.make_move(turn, mv)?;
            let score = self.search_child(state, turn, depth, alpha, beta, index == 0)?;
            state.undo_move(turn, mv)?;

            if self.aborted {
                return Ok(best);
            }

            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }

            if self.should_stop() {
                self.aborted = true;
                return Ok(best);
            }
        }

        if let (Some(table), Some(key)) = (self.table.as_deref_mut(), key) {
            table.store(key, best, depth, alpha_orig, beta);
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{PointsEvaluator, PotentialEvaluator};

    fn single_blue_position() -> GameState {
        let mut state = GameState::seeded(0);
        let mut factories = [TileCounts::new(); FACTORY_COUNT];
        factories[0][Tile::Blue] = 1;
        state.set_factories(factories);
        state
    }

    #[test]
    fn test_prefers_completing_a_line() {
        //! One blue tile left: line 1 scores immediately, the floor costs a point
        let mut state = single_blue_position();
        let mut searcher = Searcher::new(&PotentialEvaluator, None);
        let outcome = searcher
            .search_root(&mut state, 0, 1, &[])
            .expect("search succeeds");

        assert!(outcome.completed);
        assert_eq!(outcome.best_move.pattern_line, Some(0));
        assert_eq!(outcome.move_order.len(), 6);
        assert_eq!(outcome.move_order[0], outcome.best_move);
        assert!(!outcome.depth_limited, "Round ends after the only draw");
    }

    #[test]
    fn test_working_state_restored() {
        let mut state = GameState::seeded(13);
        let before = state.serialize();
        let mut table = TranspositionTable::new();
        let mut searcher = Searcher::new(&PotentialEvaluator, Some(&mut table));
        searcher
            .search_root(&mut state, 0, 2, &[])
            .expect("search succeeds");

        assert_eq!(state.serialize(), before);
        assert!(searcher.stats.nodes > searcher.stats.leaf_evaluations);
    }

    #[test]
    fn test_no_moves_is_an_error() {
        let mut state = GameState::seeded(0);
        state.set_factories([TileCounts::new(); FACTORY_COUNT]);
        let mut searcher = Searcher::new(&PointsEvaluator, None);
        assert!(matches!(
            searcher.search_root(&mut state, 1, 1, &[]),
            Err(EngineError::NoLegalMoves { player: 1 })
        ));
    }

    #[test]
    fn test_cancelled_pass_is_incomplete() {
        let mut state = GameState::seeded(14);
        let token = CancelToken::new();
        token.cancel();
        let mut searcher = Searcher::new(&PointsEvaluator, None).with_cancel(Some(&token));
        let outcome = searcher
            .search_root(&mut state, 0, 2, &[])
            .expect("search returns");

        assert!(!outcome.completed);
        assert!(outcome.move_order.is_empty());
    }

    #[test]
    fn test_matches_plain_minimax() {
        //! Negascout must return the exact negamax value at the root
        fn negamax(state: &mut GameState, turn: usize, depth: u32, evaluator: &dyn Evaluator) -> f32 {
            if depth == 0 || state.is_round_over() {
                let results = state.calculate_points(ScoringMode::Normal);
                return game_evaluation_for_player(turn, state, &results, evaluator);
            }
            let mut best = -SCORE_INF;
            for mv in state.all_moves(turn) {
                state.make_move(turn, &mv).expect("legal");
                best = best.max(-negamax(state, 1 - turn, depth - 1, evaluator));
                state.undo_move(turn, &mv).expect("undo");
            }
            best
        }

        let mut state = GameState::seeded(15);
        let mut factories = [TileCounts::new(); FACTORY_COUNT];
        factories[0] = TileCounts([2, 1, 0, 1, 0]);
        factories[1] = TileCounts([0, 0, 3, 0, 1]);
        state.set_factories(factories);

        let expected = negamax(&mut state, 0, 3, &PotentialEvaluator);
        let mut table = TranspositionTable::new();
        let mut searcher = Searcher::new(&PotentialEvaluator, Some(&mut table));
        let outcome = searcher
            .search_root(&mut state, 0, 3, &[])
            .expect("search succeeds");
        assert!((outcome.score - expected).abs() < 1e-4, "{} vs {expected}", outcome.score);
    }
}
