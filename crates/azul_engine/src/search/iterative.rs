//! Iterative deepening search
//!
//! Runs negascout at depth 1, 2, ... until the time budget, the cancel token or the
//! depth cap stops it, feeding each completed depth's root ranking into the next.

use tracing::{debug, trace};
use web_time::Instant;

use super::negascout::{SearchStats, Searcher};
use super::options::{SearchEvent, SearchOptions, SearchResult};
use crate::error::{EngineError, EngineResult};
use crate::evaluation::Evaluator;
use crate::hash::TranspositionTable;
use crate::types::*;

/// Find the best move for `turn`
///
/// `eval0` is used when player 0 is to move, `eval1` otherwise; the chosen evaluator
/// scores the whole tree. Each depth searches a fresh copy of `state`.
///
/// # Arguments
///
/// * `eval0`, `eval1` - Evaluators of player 0 and player 1
/// * `state` - Position to search (not modified)
/// * `turn` - Player to move (0 or 1)
/// * `options` - Budget, depth cap, table and progress settings
///
/// # Returns
///
/// The result of the deepest fully completed depth. Depth 1 always runs to completion
/// unless cancelled, so a result exists even with a zero time budget.
///
/// # Errors
///
/// - [`EngineError::PlayerOutOfRange`] for a bad `turn`
/// - [`EngineError::NoLegalMoves`] when `turn` cannot draw
/// - [`EngineError::NoCompletedDepth`] when cancelled before depth 1 finished
pub fn get_best_move(
    eval0: &dyn Evaluator,
    eval1: &dyn Evaluator,
    state: &GameState,
    turn: usize,
    options: &SearchOptions,
) -> EngineResult<SearchResult> {
    state.player(turn)?;
    if state.all_moves(turn).is_empty() {
        return Err(EngineError::NoLegalMoves { player: turn });
    }

    let evaluator = if turn == 0 { eval0 } else { eval1 };
    let start = Instant::now();
    let deadline = start + options.time_budget;
    let mut table = TranspositionTable::new();
    let mut stats = SearchStats::default();
    let mut move_order: Vec<Move> = Vec::new();
    let mut best: Option<(u32, Move, f32)> = None;

    for depth in 1..=options.max_depth.max(1) {
        if options.cancel.as_ref().is_some_and(|token| token.is_cancelled()) {
            trace!(depth, "search cancelled");
            break;
        }
        if depth > 1 && Instant::now() >= deadline {
            trace!(depth, "time budget spent");
            break;
        }

        if let Some(progress) = &options.progress {
            let _ = progress.send(SearchEvent::DepthStarted { depth });
        }

        let mut working = state.clone();
        let mut searcher = Searcher::new(
            evaluator,
            options.use_transposition_table.then_some(&mut table),
        )
        .with_deadline((depth > 1).then_some(deadline))
        .with_cancel(options.cancel.as_ref())
        .with_progress(options.progress.as_ref());

        let outcome = searcher.search_root(&mut working, turn, depth, &move_order)?;
        let pass = searcher.stats;
        stats.nodes += pass.nodes;
        stats.leaf_evaluations += pass.leaf_evaluations;
        stats.tt_hits += pass.tt_hits;
        stats.cutoffs += pass.cutoffs;

        if !outcome.completed {
            trace!(depth, "depth abandoned");
            break;
        }

        debug!(
            depth,
            best = %outcome.best_move,
            score = outcome.score,
            nodes = pass.nodes,
            "depth completed"
        );
        if let Some(progress) = &options.progress {
            let _ = progress.send(SearchEvent::DepthCompleted {
                depth,
                best_move: outcome.best_move,
                score: outcome.score,
                nodes_searched: stats.nodes,
                elapsed: start.elapsed(),
            });
        }

        best = Some((depth, outcome.best_move, outcome.score));
        move_order = outcome.move_order;

        if !outcome.depth_limited {
            // Every line reached the end of the round; deeper passes would repeat this one
            break;
        }
    }

    let (depth, best_move, score) = best.ok_or(EngineError::NoCompletedDepth)?;
    Ok(SearchResult {
        best_move,
        score,
        depth,
        nodes_searched: stats.nodes,
        leaf_evaluations: stats.leaf_evaluations,
        tt_hits: stats.tt_hits,
        cutoffs: stats.cutoffs,
        move_order,
        elapsed: start.elapsed(),
    })
}

/// Single negascout pass at a fixed depth, without deadline or cancellation
pub fn search_fixed_depth(
    evaluator: &dyn Evaluator,
    state: &GameState,
    turn: usize,
    depth: u32,
    use_transposition_table: bool,
) -> EngineResult<SearchResult> {
    state.player(turn)?;
    let start = Instant::now();
    let mut table = TranspositionTable::new();
    let mut working = state.clone();
    let mut searcher = Searcher::new(evaluator, use_transposition_table.then_some(&mut table));
    let outcome = searcher.search_root(&mut working, turn, depth, &[])?;

    Ok(SearchResult {
        best_move: outcome.best_move,
        score: outcome.score,
        depth: depth.max(1),
        nodes_searched: searcher.stats.nodes,
        leaf_evaluations: searcher.stats.leaf_evaluations,
        tt_hits: searcher.stats.tt_hits,
        cutoffs: searcher.stats.cutoffs,
        move_order: outcome.move_order,
        elapsed: start.elapsed(),
    })
}
