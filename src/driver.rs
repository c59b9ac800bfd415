//! Engine-vs-engine game loop
//!
//! Drives the round state machine: players alternate drawing until the round is
//! over, the round is scored, and a new round is dealt until someone completes a
//! wall row. Each move is searched on a worker thread while this thread follows the
//! progress channel and cancels searches that overrun their budget.

use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use azul_engine::{
    get_best_move, CancelToken, Evaluator, GameState, ScoringMode, SearchEvent, SearchOptions,
    SearchResult,
};
use crossbeam_channel::RecvTimeoutError;
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::config::Config;

/// Rounds after which a game is abandoned
pub const MAX_ROUNDS: u32 = 50;

/// Summary of a finished game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    pub seed: u64,
    pub final_points: [u32; 2],
    pub rounds: u32,
    pub moves: u32,
    /// `None` on a tie
    pub winner: Option<usize>,
}

/// Search one move on a worker thread, logging progress as it arrives
///
/// The search stops itself at its time budget; if it runs well past that, it is cancelled
/// through its token.
pub fn think(
    evaluators: &[Box<dyn Evaluator>; 2],
    state: &GameState,
    turn: usize,
    options: &SearchOptions,
) -> Result<SearchResult> {
    let (sender, receiver) = crossbeam_channel::unbounded();
    let cancel = CancelToken::new();
    let hard_limit = options.time_budget * 2 + Duration::from_secs(1);
    let options = options
        .clone()
        .with_progress(sender)
        .with_cancel(cancel.clone());

    thread::scope(|scope| {
        let worker = scope.spawn(move || {
            get_best_move(&*evaluators[0], &*evaluators[1], state, turn, &options)
        });

        let started = Instant::now();
        loop {
            match receiver.recv_timeout(Duration::from_millis(50)) {
                Ok(SearchEvent::DepthCompleted {
                    depth,
                    best_move,
                    score,
                    nodes_searched,
                    elapsed,
                }) => {
                    debug!(
                        "[AI] Depth {} done | Best={} | Score={:.2} | Nodes={} | {:?}",
                        depth, best_move, score, nodes_searched, elapsed
                    );
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => {
                    if started.elapsed() > hard_limit && !cancel.is_cancelled() {
                        warn!("[AI] Search overran its budget, cancelling");
                        cancel.cancel();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        worker
            .join()
            .map_err(|_| anyhow!("search thread panicked"))?
            .context("search failed")
    })
}

/// Play one full game from `seed`
///
/// # Returns
///
/// The game record and the final position.
pub fn play_game(config: &Config, seed: u64) -> Result<(GameRecord, GameState)> {
    let evaluators = config.evaluators();
    let options = config.search_options();
    let mut state = GameState::seeded(seed);
    let mut turn = 0;
    let mut rounds = 1;
    let mut moves = 0;

    info!(
        "[GAME] Seed {} | {} vs {} | {:.2}s per move",
        seed, config.eval0, config.eval1, config.think_time
    );

    loop {
        debug!("[GAME] Round {} dealt\n{}", rounds, state);

        while !state.is_round_over() {
            let result = think(&evaluators, &state, turn, &options)?;
            state
                .make_move(turn, &result.best_move)
                .with_context(|| format!("engine chose an illegal move in round {rounds}"))?;
            moves += 1;

            info!(
                "[AI] Player {} plays {} | Depth={} | Score={:.2} | Nodes={} | Time={:.2}s",
                turn + 1,
                result.best_move,
                result.depth,
                result.score,
                result.nodes_searched,
                result.elapsed.as_secs_f32()
            );
            turn = 1 - turn;
        }

        state.calculate_points_and_modify(ScoringMode::Normal);
        info!(
            "[GAME] Round {} scored | {} - {}",
            rounds, state.players[0].points, state.players[1].points
        );

        if state.is_game_over() {
            state.calculate_points_and_modify(ScoringMode::BonusOnly);
            break;
        }
        if rounds >= MAX_ROUNDS {
            bail!("game with seed {seed} did not finish within {MAX_ROUNDS} rounds");
        }

        turn = state.new_round();
        rounds += 1;
    }

    let final_points = [state.players[0].points, state.players[1].points];
    let winner = match final_points[0].cmp(&final_points[1]) {
        std::cmp::Ordering::Greater => Some(0),
        std::cmp::Ordering::Less => Some(1),
        std::cmp::Ordering::Equal => None,
    };
    info!(
        "[GAME] Finished after {} rounds | Final {} - {}",
        rounds, final_points[0], final_points[1]
    );

    Ok((
        GameRecord {
            seed,
            final_points,
            rounds,
            moves,
            winner,
        },
        state,
    ))
}

/// Play every configured game and write the optional snapshot
pub fn run(config: &Config) -> Result<Vec<GameRecord>> {
    config.validate()?;
    let base_seed = config.seed.unwrap_or_else(rand::random::<u64>);
    let mut records = Vec::with_capacity(config.games as usize);
    let mut last_state = None;

    for game in 0..config.games {
        let (record, state) = play_game(config, base_seed.wrapping_add(game as u64))?;
        records.push(record);
        last_state = Some(state);
    }

    if let (Some(path), Some(state)) = (&config.snapshot_out, &last_state) {
        let json = state.to_json(0)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        info!("[GAME] Snapshot written to {}", path.display());
    }

    let wins = |player| records.iter().filter(|r| r.winner == Some(player)).count();
    info!(
        "[GAME] {} games | {} wins {} | {} wins {} | ties {}",
        records.len(),
        config.eval0,
        wins(0),
        config.eval1,
        wins(1),
        records.iter().filter(|r| r.winner.is_none()).count()
    );

    Ok(records)
}
